//! Decode rules for register payloads.
//!
//! Each register value type knows how many payload bytes it needs (which is
//! also the length the device is asked for in the READ argument) and how to
//! turn those bytes into a typed value.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::mode::{BuzzerMode, LedMode, Model, UnknownCode, UsbMode};

/// Offset of the identifier length byte in a last-tag payload.
pub const TAG_LENGTH_OFFSET: usize = 16;

/// Longest identifier the last-tag register can carry.
pub const MAX_TAG_LEN: usize = 16;

/// Payload size of the last-tag register: identifier field, length, spare.
pub const TAG_PAYLOAD_LEN: usize = 18;

/// Shape of a register's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// First byte as an unsigned integer.
    RawByte,
    /// First byte looked up in an enumeration.
    Code8,
    /// Big-endian `u16` looked up in an enumeration.
    Code16,
    /// First byte scaled by 0.1.
    Tenths,
    /// Two bytes rendered `major.minor`.
    Version,
    /// Length-prefixed identifier rendered as dashed hex.
    TagId,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValueKind::RawByte => "raw byte",
            ValueKind::Code8 => "enum (1 byte)",
            ValueKind::Code16 => "enum (2 bytes)",
            ValueKind::Tenths => "fixed-point x0.1",
            ValueKind::Version => "version",
            ValueKind::TagId => "hex id",
        };
        f.write_str(text)
    }
}

/// Why a payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("payload too short ({len} bytes, need {needed})")]
    ShortPayload { needed: usize, len: usize },

    #[error("tag length {len} out of range")]
    TagLength { len: u8 },

    #[error(transparent)]
    UnknownValue(#[from] UnknownCode),
}

/// A value that can be read from a register.
pub trait RegisterValue: Sized {
    /// Payload shape, for the register table.
    const KIND: ValueKind;

    /// Payload bytes the decode rule consumes; also the READ length argument.
    const PAYLOAD_LEN: usize;

    /// Decode from a response payload (header already stripped).
    fn decode(payload: &[u8]) -> Result<Self, DecodeError>;
}

/// A value that can be written to a register as a single byte.
pub trait WritableValue: RegisterValue {
    fn encode(&self) -> u8;
}

fn take<const N: usize>(payload: &[u8]) -> Result<[u8; N], DecodeError> {
    payload
        .get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::ShortPayload {
            needed: N,
            len: payload.len(),
        })
}

impl RegisterValue for u8 {
    const KIND: ValueKind = ValueKind::RawByte;
    const PAYLOAD_LEN: usize = 1;

    fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let [byte] = take::<1>(payload)?;
        Ok(byte)
    }
}

macro_rules! byte_coded {
    ($($ty:ty),+) => {
        $(
            impl RegisterValue for $ty {
                const KIND: ValueKind = ValueKind::Code8;
                const PAYLOAD_LEN: usize = 1;

                fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
                    let [code] = take::<1>(payload)?;
                    Ok(<$ty>::try_from(code)?)
                }
            }

            impl WritableValue for $ty {
                fn encode(&self) -> u8 {
                    self.code()
                }
            }
        )+
    };
}

byte_coded!(UsbMode, LedMode, BuzzerMode);

impl RegisterValue for Model {
    const KIND: ValueKind = ValueKind::Code16;
    const PAYLOAD_LEN: usize = 2;

    fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let code = u16::from_be_bytes(take::<2>(payload)?);
        Ok(Model::try_from(code)?)
    }
}

/// Delay between consecutive tag reads, in tenths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ReadDelay(u8);

impl ReadDelay {
    pub const fn from_multiplier(multiplier: u8) -> Self {
        Self(multiplier)
    }

    /// Raw register value (tenths of a second).
    pub const fn multiplier(self) -> u8 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(u64::from(self.0) * 100)
    }
}

impl RegisterValue for ReadDelay {
    const KIND: ValueKind = ValueKind::Tenths;
    const PAYLOAD_LEN: usize = 1;

    fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let [multiplier] = take::<1>(payload)?;
        Ok(Self(multiplier))
    }
}

impl WritableValue for ReadDelay {
    fn encode(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ReadDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} s", self.as_secs_f64())
    }
}

/// Error parsing a [`ReadDelay`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid read delay '{0}' (expected a multiplier 0-255 or seconds 0.0s-25.5s)")]
pub struct ParseReadDelayError(String);

impl FromStr for ReadDelay {
    type Err = ParseReadDelayError;

    /// `"5"` is a raw multiplier; `"0.5s"` is seconds, rounded to tenths.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let invalid = || ParseReadDelayError(input.to_string());

        if let Some(seconds) = trimmed.strip_suffix('s') {
            let seconds: f64 = seconds.trim().parse().map_err(|_| invalid())?;
            let tenths = (seconds * 10.0).round();
            if !(0.0..=f64::from(u8::MAX)).contains(&tenths) {
                return Err(invalid());
            }
            return Ok(Self(tenths as u8));
        }

        trimmed.parse::<u8>().map(Self).map_err(|_| invalid())
    }
}

impl Serialize for ReadDelay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

/// Firmware or hardware revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl RegisterValue for Version {
    const KIND: ValueKind = ValueKind::Version;
    const PAYLOAD_LEN: usize = 2;

    fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let [major, minor] = take::<2>(payload)?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identifier of the last tag seen by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagId(Vec<u8>);

impl TagId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `None` when the reader has not seen a tag.
impl RegisterValue for Option<TagId> {
    const KIND: ValueKind = ValueKind::TagId;
    const PAYLOAD_LEN: usize = TAG_PAYLOAD_LEN;

    fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let field = take::<TAG_PAYLOAD_LEN>(payload)?;
        let len = field[TAG_LENGTH_OFFSET];
        if usize::from(len) > MAX_TAG_LEN {
            return Err(DecodeError::TagLength { len });
        }
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(TagId(field[..usize::from(len)].to_vec())))
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for TagId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
