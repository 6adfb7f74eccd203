//! Configure and query Inveo RFID/NFC readers.
//!
//! # Crate Structure
//!
//! - [`transport`]: `hidraw` device handle and device lookup
//! - [`frame`]: request/response frame codec
//! - [`device`]: register map, typed values and the device session
//!
//! ```no_run
//! use inveo::device::{DeviceSession, LedMode};
//!
//! let dev = DeviceSession::open("/dev/hidraw0")?;
//! dev.set_led1_mode(LedMode::OnRead)?;
//! println!("model: {}", dev.model()?);
//! # Ok::<(), inveo::device::DeviceError>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use inveo_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use inveo_frame::*;
}

/// Re-export device types.
pub mod device {
    pub use inveo_device::*;
}
