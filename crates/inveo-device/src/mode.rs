//! Enumerated register values.
//!
//! Every enumeration decodes through `TryFrom` and fails with [`UnknownCode`]
//! on codes the device firmware does not define. Names are kebab-case for
//! display, parsing and serialization alike.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A register returned a code outside its enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code:#04x}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u16,
}

/// A name did not match any member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{input}' (expected one of: {expected})")]
pub struct ParseModeError {
    pub kind: &'static str,
    pub input: String,
    pub expected: String,
}

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident: $repr:ty, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[repr($repr)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant = $code,)+
        }

        impl $name {
            /// Every member, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Human-readable name of this enumeration.
            pub const KIND: &'static str = $kind;

            /// Wire code of this member.
            pub const fn code(self) -> $repr {
                self as $repr
            }

            /// Kebab-case name of this member.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = UnknownCode;

            fn try_from(code: $repr) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(UnknownCode {
                        kind: $kind,
                        code: u16::from(other),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseModeError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                let wanted = input.trim().to_ascii_lowercase().replace('_', "-");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|member| member.as_str() == wanted)
                    .ok_or_else(|| ParseModeError {
                        kind: $kind,
                        input: input.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|member| member.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

code_enum! {
    /// How the reader presents itself on the USB bus.
    UsbMode: u8, "USB mode" {
        /// Tag ids are typed as keyboard input.
        Keyboard = 0 => "keyboard",
        /// Raw HID only; tags are polled through the last-tag register.
        Hid = 1 => "hid",
        /// Tag ids are sent over a CDC serial port.
        VirtualSerial = 2 => "virtual-serial",
    }
}

code_enum! {
    /// Behaviour of one indicator LED. Shared by all three channels.
    LedMode: u8, "LED mode" {
        Off = 0 => "off",
        On = 1 => "on",
        /// Lit while a tag read is in progress.
        OnRead = 2 => "on-read",
        /// Lit while a tag is in the field.
        OnProximity = 3 => "on-proximity",
    }
}

code_enum! {
    /// When the buzzer sounds.
    BuzzerMode: u8, "buzzer mode" {
        Off = 0 => "off",
        OnRead = 1 => "on-read",
        OnProximity = 2 => "on-proximity",
    }
}

code_enum! {
    /// Hardware model, reported as a 2-byte big-endian code.
    Model: u16, "model" {
        /// 125 kHz EM4100/Unique reader.
        Usb125Khz = 0x0101 => "usb-125khz",
        /// 13.56 MHz MIFARE/NFC reader.
        Usb1356Mhz = 0x0102 => "usb-1356mhz",
        /// Dual-frequency reader.
        UsbDual = 0x0103 => "usb-dual",
    }
}
