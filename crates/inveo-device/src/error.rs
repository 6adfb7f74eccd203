use inveo_frame::FrameError;
use inveo_transport::TransportError;

use crate::mode::UnknownCode;
use crate::value::DecodeError;

/// Errors that can occur in device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Opening or talking to the device handle failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request/response exchange failed or the response was malformed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The response payload is too short for the register's decode rule.
    #[error("{register}: payload too short ({len} bytes, need {needed})")]
    ShortPayload {
        register: &'static str,
        needed: usize,
        len: usize,
    },

    /// The reported tag length exceeds the identifier field.
    #[error("{register}: tag length {len} out of range (max 16)")]
    TagLength { register: &'static str, len: u8 },

    /// The decoded code is not a member of the register's enumeration.
    #[error("{register}: {source}")]
    UnknownValue {
        register: &'static str,
        source: UnknownCode,
    },

    /// A previous caller panicked while holding the device.
    #[error("device lock poisoned")]
    LockPoisoned,
}

impl DeviceError {
    pub(crate) fn decode(register: &'static str, err: DecodeError) -> Self {
        match err {
            DecodeError::ShortPayload { needed, len } => DeviceError::ShortPayload {
                register,
                needed,
                len,
            },
            DecodeError::TagLength { len } => DeviceError::TagLength { register, len },
            DecodeError::UnknownValue(source) => DeviceError::UnknownValue { register, source },
        }
    }

    /// The channel itself failed (open, read, write, disconnect).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DeviceError::Transport(_)
                | DeviceError::Frame(FrameError::Io(_) | FrameError::ConnectionClosed)
                | DeviceError::LockPoisoned
        )
    }

    /// The device answered, but the answer broke the protocol.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            DeviceError::Frame(
                FrameError::BadStatus { .. }
                    | FrameError::BadEndOfFrame { .. }
                    | FrameError::Truncated { .. }
                    | FrameError::UnknownCommand(_)
            ) | DeviceError::ShortPayload { .. }
                | DeviceError::TagLength { .. }
        )
    }

    /// The answer decoded to a code outside the register's enumeration.
    pub fn is_unknown_value(&self) -> bool {
        matches!(self, DeviceError::UnknownValue { .. })
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
