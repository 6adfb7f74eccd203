//! Device handle for Inveo RFID/NFC readers.
//!
//! The reader enumerates as a USB HID device. On Linux the kernel exposes it
//! as a `hidraw` character device, which already behaves as a duplex,
//! report-oriented byte channel:
//! - each `write` sends one output report (first byte is the report id)
//! - each `read` returns one input report
//!
//! This is the lowest layer of the inveo crates. Everything above it only
//! needs `Read + Write`, so tests substitute in-memory doubles for
//! [`HidStream`].

pub mod error;

#[cfg(unix)]
pub mod hidraw;

pub use error::{Result, TransportError};

#[cfg(unix)]
pub use hidraw::{find_device, open_device, HidStream};

/// USB vendor id of the reader (Microchip VID, used by Inveo).
pub const VENDOR_ID: u16 = 0x04D8;

/// USB product id of the reader.
pub const PRODUCT_ID: u16 = 0xFC27;
