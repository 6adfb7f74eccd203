//! Request/response framing for the Inveo reader register protocol.
//!
//! Every request is a HID output report:
//! - a 1-byte report id (always 0)
//! - a 1-byte command tag (read or write)
//! - a 2-byte big-endian register address
//! - an optional argument, appended verbatim
//!
//! Responses are fixed-size input reports with a status byte up front, an
//! end-of-frame byte at the tail, and register data from offset 4.

pub mod codec;
pub mod command;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    check_response, encode_request, payload_of, FrameConfig, Request, DEFAULT_RESPONSE_SIZE,
    END_OF_FRAME, HEADER_SIZE, REPORT_ID, STATUS_OK,
};
pub use command::Command;
pub use error::{FrameError, Result};
pub use reader::read_response;
pub use writer::write_request;
