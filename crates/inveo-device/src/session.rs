use std::io::{Read, Write};
#[cfg(unix)]
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::BytesMut;
use inveo_frame::{
    check_response, payload_of, read_response, write_request, Command, FrameConfig, Request,
};
#[cfg(unix)]
use inveo_transport::HidStream;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DeviceError, Result};
use crate::mode::{BuzzerMode, LedMode, Model, UsbMode};
use crate::register::{self, LedChannel, ReadWrite, Register};
use crate::value::{ReadDelay, RegisterValue, TagId, Version, WritableValue};

/// Argument count byte of every register WRITE.
const WRITE_COUNT: u8 = 1;

/// An open connection to one reader.
///
/// The session owns the device handle exclusively and releases it when
/// dropped, on every exit path. Each accessor performs exactly one
/// request/response round trip; nothing is cached. The handle is locked for
/// the whole write+read sequence, so a session shared between threads never
/// interleaves frames.
pub struct DeviceSession<T> {
    inner: Mutex<T>,
    config: FrameConfig,
}

/// Every readable register, read in address order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: u8,
    pub usb_mode: UsbMode,
    pub led1: LedMode,
    pub led2: LedMode,
    pub led3: LedMode,
    pub buzzer: BuzzerMode,
    pub read_delay: ReadDelay,
    pub model: Model,
    pub software_version: Version,
    pub hardware_version: Version,
    pub last_tag: Option<TagId>,
}

#[cfg(unix)]
impl DeviceSession<HidStream> {
    /// Open the reader at a `hidraw` node with default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, FrameConfig::default())
    }

    /// Open the reader at a `hidraw` node and apply the read timeout.
    pub fn open_with_config(path: impl AsRef<Path>, config: FrameConfig) -> Result<Self> {
        let mut stream = HidStream::open(path)?;
        stream.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(stream, config))
    }

    /// Locate the reader by its USB ids and open it.
    pub fn open_default(config: FrameConfig) -> Result<Self> {
        let path = inveo_transport::find_device(
            inveo_transport::VENDOR_ID,
            inveo_transport::PRODUCT_ID,
        )?;
        Self::open_with_config(path, config)
    }
}

impl<T: Read + Write> DeviceSession<T> {
    /// Wrap an already open handle with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Wrap an already open handle with explicit configuration.
    ///
    /// `config.read_timeout` is not applied here; the handle is used as is.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner: Mutex::new(inner),
            config,
        }
    }

    /// Current frame configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Release the session and hand back the device handle.
    pub fn close(self) -> T {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Read and decode one register.
    pub fn read<V: RegisterValue, A>(&self, reg: &Register<V, A>) -> Result<V> {
        let request =
            Request::new(Command::Read, reg.address()).with_argument(vec![reg.read_len()]);
        let response = self.round_trip(reg.name(), &request)?;
        V::decode(payload_of(&response)).map_err(|err| DeviceError::decode(reg.name(), err))
    }

    /// Encode and write one register.
    pub fn write<V: WritableValue>(&self, reg: &Register<V, ReadWrite>, value: V) -> Result<()> {
        let request = Request::new(Command::Write, reg.address())
            .with_argument(vec![WRITE_COUNT, value.encode()]);
        self.round_trip(reg.name(), &request)?;
        Ok(())
    }

    /// Device operating mode (raw).
    pub fn mode(&self) -> Result<u8> {
        self.read(&register::MODE)
    }

    pub fn usb_mode(&self) -> Result<UsbMode> {
        self.read(&register::USB_MODE)
    }

    pub fn set_usb_mode(&self, mode: UsbMode) -> Result<()> {
        self.write(&register::USB_MODE, mode)
    }

    pub fn led_mode(&self, channel: LedChannel) -> Result<LedMode> {
        self.read(&channel.register())
    }

    pub fn set_led_mode(&self, channel: LedChannel, mode: LedMode) -> Result<()> {
        self.write(&channel.register(), mode)
    }

    pub fn led1_mode(&self) -> Result<LedMode> {
        self.led_mode(LedChannel::One)
    }

    pub fn set_led1_mode(&self, mode: LedMode) -> Result<()> {
        self.set_led_mode(LedChannel::One, mode)
    }

    pub fn led2_mode(&self) -> Result<LedMode> {
        self.led_mode(LedChannel::Two)
    }

    pub fn set_led2_mode(&self, mode: LedMode) -> Result<()> {
        self.set_led_mode(LedChannel::Two, mode)
    }

    pub fn led3_mode(&self) -> Result<LedMode> {
        self.led_mode(LedChannel::Three)
    }

    pub fn set_led3_mode(&self, mode: LedMode) -> Result<()> {
        self.set_led_mode(LedChannel::Three, mode)
    }

    pub fn buzzer_mode(&self) -> Result<BuzzerMode> {
        self.read(&register::BUZZER)
    }

    pub fn set_buzzer_mode(&self, mode: BuzzerMode) -> Result<()> {
        self.write(&register::BUZZER, mode)
    }

    pub fn read_delay(&self) -> Result<ReadDelay> {
        self.read(&register::READ_DELAY)
    }

    pub fn set_read_delay(&self, delay: ReadDelay) -> Result<()> {
        self.write(&register::READ_DELAY, delay)
    }

    pub fn model(&self) -> Result<Model> {
        self.read(&register::MODEL)
    }

    pub fn software_version(&self) -> Result<Version> {
        self.read(&register::SOFTWARE_VERSION)
    }

    pub fn hardware_version(&self) -> Result<Version> {
        self.read(&register::HARDWARE_VERSION)
    }

    /// Identifier of the last tag read, or `None` if no tag has been seen.
    pub fn last_tag(&self) -> Result<Option<TagId>> {
        self.read(&register::LAST_TAG)
    }

    /// Sound the buzzer once.
    pub fn beep(&self) -> Result<()> {
        self.round_trip("beep", &Request::new(Command::Write, register::BEEP))?;
        Ok(())
    }

    /// Reboot the reader.
    ///
    /// Fire-and-forget: the device drops off the bus instead of answering, so
    /// no response is read and only transport errors are reported.
    pub fn reset(&self) -> Result<()> {
        let frame = Request::new(Command::Write, register::RESET).encode();
        let mut inner = self.lock()?;
        debug!(register = "reset", address = register::RESET, "sending reset");
        write_request(&mut *inner, &frame)?;
        Ok(())
    }

    /// Read every readable register.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            mode: self.mode()?,
            usb_mode: self.usb_mode()?,
            led1: self.led1_mode()?,
            led2: self.led2_mode()?,
            led3: self.led3_mode()?,
            buzzer: self.buzzer_mode()?,
            read_delay: self.read_delay()?,
            model: self.model()?,
            software_version: self.software_version()?,
            hardware_version: self.hardware_version()?,
            last_tag: self.last_tag()?,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, T>> {
        self.inner.lock().map_err(|_| DeviceError::LockPoisoned)
    }

    fn round_trip(&self, name: &'static str, request: &Request) -> Result<BytesMut> {
        let frame = request.encode();
        debug!(
            register = name,
            address = request.address,
            command = %request.command,
            "register request"
        );

        let response = {
            let mut inner = self.lock()?;
            write_request(&mut *inner, &frame)?;
            read_response(&mut *inner, self.config.response_size)?
        };

        if let Err(err) = check_response(&response) {
            warn!(register = name, error = %err, "rejected response");
            return Err(err.into());
        }
        Ok(response)
    }
}

impl<T> std::fmt::Debug for DeviceSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
