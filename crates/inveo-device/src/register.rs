//! The reader's register map.
//!
//! Every register is a typed descriptor: the value type fixes the decode rule
//! and the READ length, the access marker decides whether
//! [`DeviceSession::write`](crate::DeviceSession::write) accepts it.
//!
//! | Register | Address | Access |
//! |---|---|---|
//! | mode | 0x0000 | read |
//! | usb-mode | 0x0001 | read/write |
//! | led1 / led2 / led3 | 0x0002 / 0x0003 / 0x0004 | read/write |
//! | buzzer | 0x0005 | read/write |
//! | read-delay | 0x0006 | read/write |
//! | model | 0x0100 | read |
//! | software-version | 0x0101 | read |
//! | hardware-version | 0x0102 | read |
//! | last-tag | 0x010B | read |
//!
//! The trigger addresses [`BEEP`] and [`RESET`] take no argument and are not
//! registers.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Serialize;

use crate::mode::{BuzzerMode, LedMode, Model, UsbMode};
use crate::value::{ReadDelay, RegisterValue, TagId, ValueKind, Version};

/// Registers that can only be read.
#[derive(Debug, Clone, Copy)]
pub enum ReadOnly {}

/// Registers that can be read and written.
#[derive(Debug, Clone, Copy)]
pub enum ReadWrite {}

pub trait Access {
    const WRITABLE: bool;
}

impl Access for ReadOnly {
    const WRITABLE: bool = false;
}

impl Access for ReadWrite {
    const WRITABLE: bool = true;
}

/// Untyped description of one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterInfo {
    pub name: &'static str,
    pub address: u16,
    /// Number of payload bytes requested in a READ.
    pub read_len: u8,
    pub kind: ValueKind,
    pub writable: bool,
}

/// A register whose payload decodes into `V`, with access `A`.
pub struct Register<V, A> {
    info: RegisterInfo,
    _marker: PhantomData<fn() -> (V, A)>,
}

impl<V: RegisterValue, A: Access> Register<V, A> {
    const fn new(name: &'static str, address: u16) -> Self {
        Self {
            info: RegisterInfo {
                name,
                address,
                read_len: V::PAYLOAD_LEN as u8,
                kind: V::KIND,
                writable: A::WRITABLE,
            },
            _marker: PhantomData,
        }
    }
}

impl<V, A> Register<V, A> {
    pub const fn info(&self) -> &RegisterInfo {
        &self.info
    }

    pub const fn name(&self) -> &'static str {
        self.info.name
    }

    pub const fn address(&self) -> u16 {
        self.info.address
    }

    pub const fn read_len(&self) -> u8 {
        self.info.read_len
    }
}

impl<V, A> Clone for Register<V, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, A> Copy for Register<V, A> {}

impl<V, A> fmt::Debug for Register<V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("name", &self.info.name)
            .field("address", &format_args!("{:#06x}", self.info.address))
            .finish()
    }
}

pub const MODE: Register<u8, ReadOnly> = Register::new("mode", 0x0000);
pub const USB_MODE: Register<UsbMode, ReadWrite> = Register::new("usb-mode", 0x0001);
pub const LED1: Register<LedMode, ReadWrite> = Register::new("led1", 0x0002);
pub const LED2: Register<LedMode, ReadWrite> = Register::new("led2", 0x0003);
pub const LED3: Register<LedMode, ReadWrite> = Register::new("led3", 0x0004);
pub const BUZZER: Register<BuzzerMode, ReadWrite> = Register::new("buzzer", 0x0005);
pub const READ_DELAY: Register<ReadDelay, ReadWrite> = Register::new("read-delay", 0x0006);
pub const MODEL: Register<Model, ReadOnly> = Register::new("model", 0x0100);
pub const SOFTWARE_VERSION: Register<Version, ReadOnly> =
    Register::new("software-version", 0x0101);
pub const HARDWARE_VERSION: Register<Version, ReadOnly> =
    Register::new("hardware-version", 0x0102);
pub const LAST_TAG: Register<Option<TagId>, ReadOnly> = Register::new("last-tag", 0x010B);

/// Write-only trigger: sound the buzzer once.
pub const BEEP: u16 = 0xFE00;

/// Write-only trigger: reboot the reader. The device sends no response.
pub const RESET: u16 = 0xFE01;

/// Every register, in address order.
pub const REGISTERS: [RegisterInfo; 11] = [
    MODE.info,
    USB_MODE.info,
    LED1.info,
    LED2.info,
    LED3.info,
    BUZZER.info,
    READ_DELAY.info,
    MODEL.info,
    SOFTWARE_VERSION.info,
    HARDWARE_VERSION.info,
    LAST_TAG.info,
];

/// Look up a register by name.
pub fn find(name: &str) -> Option<&'static RegisterInfo> {
    REGISTERS.iter().find(|info| info.name == name)
}

/// One of the three indicator LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedChannel {
    One,
    Two,
    Three,
}

impl LedChannel {
    pub const ALL: [LedChannel; 3] = [LedChannel::One, LedChannel::Two, LedChannel::Three];

    pub const fn register(self) -> Register<LedMode, ReadWrite> {
        match self {
            LedChannel::One => LED1,
            LedChannel::Two => LED2,
            LedChannel::Three => LED3,
        }
    }
}

impl FromStr for LedChannel {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "1" | "led1" => Ok(LedChannel::One),
            "2" | "led2" => Ok(LedChannel::Two),
            "3" | "led3" => Ok(LedChannel::Three),
            other => Err(format!("invalid LED channel '{other}' (expected 1, 2 or 3)")),
        }
    }
}
