use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::command::Command;
use crate::error::{FrameError, Result};

/// Request header: report id (1) + command (1) + address (2) = 4 bytes.
///
/// Responses carry a header of the same size ahead of the payload.
pub const HEADER_SIZE: usize = 4;

/// HID report id placed in the first byte of every request.
pub const REPORT_ID: u8 = 0;

/// Size of one response report on the reference device.
pub const DEFAULT_RESPONSE_SIZE: usize = 32;

/// Expected first byte of a response.
pub const STATUS_OK: u8 = 2;

/// Expected last byte of a response.
pub const END_OF_FRAME: u8 = 0x55;

/// A single register request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub address: u16,
    /// Interpreted by the device according to the register; no length prefix.
    pub argument: Bytes,
}

impl Request {
    /// Create a request without an argument.
    pub fn new(command: Command, address: u16) -> Self {
        Self {
            command,
            address,
            argument: Bytes::new(),
        }
    }

    /// Attach an argument to the request.
    pub fn with_argument(mut self, argument: impl Into<Bytes>) -> Self {
        self.argument = argument.into();
        self
    }

    /// The total wire size of this request (header + argument).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.argument.len()
    }

    /// Encode into a freshly allocated buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        encode_request(self.command, self.address, &self.argument, &mut buf);
        buf.freeze()
    }
}

/// Encode a request into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬─────────┬──────────────┬──────────────────┐
/// │ Report id │ Command │ Address      │ Argument          │
/// │ 0x00      │ (1B)    │ (2B BE)      │ (0..n bytes)      │
/// └───────────┴─────────┴──────────────┴──────────────────┘
/// ```
pub fn encode_request(command: Command, address: u16, argument: &[u8], dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE + argument.len());
    dst.put_u8(REPORT_ID);
    dst.put_u8(command.tag());
    dst.put_u16(address);
    dst.put_slice(argument);
}

/// Register data of a response: everything after the header.
///
/// Pure slicing, no validation.
pub fn payload_of(response: &[u8]) -> &[u8] {
    response.get(HEADER_SIZE..).unwrap_or(&[])
}

/// Check both sentinels of a response report.
///
/// The status byte and the end-of-frame byte are checked independently;
/// either mismatch is an error.
pub fn check_response(response: &[u8]) -> Result<()> {
    let (Some(&status), Some(&end)) = (response.first(), response.last()) else {
        return Err(FrameError::Truncated {
            len: 0,
            expected: HEADER_SIZE,
        });
    };
    if status != STATUS_OK {
        return Err(FrameError::BadStatus { found: status });
    }
    if end != END_OF_FRAME {
        return Err(FrameError::BadEndOfFrame { found: end });
    }
    Ok(())
}

/// Configuration for the frame exchange.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Size of one response report in bytes. Default: 32.
    pub response_size: usize,
    /// Read timeout for blocking response reads. Default: none.
    pub read_timeout: Option<Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            response_size: DEFAULT_RESPONSE_SIZE,
            read_timeout: None,
        }
    }
}
