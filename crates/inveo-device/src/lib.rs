//! Register-level control of Inveo RFID/NFC readers.
//!
//! - [`register`] is the register map: one typed descriptor per register.
//! - [`mode`] and [`value`] hold the values those registers decode into.
//! - [`session`] owns the device handle and performs one request/response
//!   round trip per accessor call.

pub mod error;
pub mod mode;
pub mod register;
pub mod session;
pub mod value;

pub use error::{DeviceError, Result};
pub use mode::{BuzzerMode, LedMode, Model, ParseModeError, UnknownCode, UsbMode};
pub use register::{LedChannel, ReadOnly, ReadWrite, Register, RegisterInfo, REGISTERS};
pub use session::{DeviceSession, Snapshot};
pub use value::{DecodeError, ReadDelay, RegisterValue, TagId, ValueKind, Version, WritableValue};
