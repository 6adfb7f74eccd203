use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use inveo_device::register::{self, Register};
use inveo_device::{DeviceSession, RegisterValue};
use inveo_frame::FrameConfig;
use serde::Serialize;
use tracing::debug;

use crate::exit::{device_error, CliError, CliResult, USAGE};
use crate::output::{OutputFormat, RegisterValueOutput};

pub mod doctor;
pub mod get;
pub mod registers;
pub mod set;
pub mod show;
pub mod trigger;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read and print every register.
    Show(ShowArgs),
    /// Read one register.
    Get(GetArgs),
    /// Write one register.
    Set(SetArgs),
    /// Sound the buzzer once.
    Beep,
    /// Reboot the reader.
    Reset,
    /// List the register map (no device needed).
    Registers,
    /// Show version information.
    Version(VersionArgs),
    /// Run device and environment health checks.
    Doctor(DoctorArgs),
}

pub fn run(command: Command, connection: &Connection, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Show(args) => show::run(args, connection, format),
        Command::Get(args) => get::run(args, connection, format),
        Command::Set(args) => set::run(args, connection, format),
        Command::Beep => trigger::run(trigger::Trigger::Beep, connection, format),
        Command::Reset => trigger::run(trigger::Trigger::Reset, connection, format),
        Command::Registers => registers::run(format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, connection, format),
    }
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Register to read.
    pub register: ReadableRegister,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Register to write.
    pub register: SettableRegister,
    /// New value: a mode name (e.g. on-read), or for read-delay a multiplier
    /// (5) or seconds (0.5s).
    pub value: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

/// Every register `get` can read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReadableRegister {
    Mode,
    UsbMode,
    Led1,
    Led2,
    Led3,
    Buzzer,
    ReadDelay,
    Model,
    SoftwareVersion,
    HardwareVersion,
    LastTag,
}

/// Every register `set` can write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SettableRegister {
    UsbMode,
    Led1,
    Led2,
    Led3,
    Buzzer,
    ReadDelay,
}

/// Command-line name of a value enum member, e.g. `read-delay`.
pub fn arg_name(value: &impl ValueEnum) -> String {
    value
        .to_possible_value()
        .map(|possible| possible.get_name().to_string())
        .unwrap_or_default()
}

/// Read one register and pair the decoded value with its descriptor.
pub fn read_register<T: Read + Write>(
    session: &DeviceSession<T>,
    which: ReadableRegister,
) -> inveo_device::Result<RegisterValueOutput> {
    match which {
        ReadableRegister::Mode => read_value(session, &register::MODE),
        ReadableRegister::UsbMode => read_value(session, &register::USB_MODE),
        ReadableRegister::Led1 => read_value(session, &register::LED1),
        ReadableRegister::Led2 => read_value(session, &register::LED2),
        ReadableRegister::Led3 => read_value(session, &register::LED3),
        ReadableRegister::Buzzer => read_value(session, &register::BUZZER),
        ReadableRegister::ReadDelay => read_value(session, &register::READ_DELAY),
        ReadableRegister::Model => read_value(session, &register::MODEL),
        ReadableRegister::SoftwareVersion => read_value(session, &register::SOFTWARE_VERSION),
        ReadableRegister::HardwareVersion => read_value(session, &register::HARDWARE_VERSION),
        ReadableRegister::LastTag => {
            let tag = session.last_tag()?;
            Ok(RegisterValueOutput::optional(
                register::LAST_TAG.name(),
                register::LAST_TAG.address(),
                tag.as_ref(),
            ))
        }
    }
}

fn read_value<T, V, A>(
    session: &DeviceSession<T>,
    reg: &Register<V, A>,
) -> inveo_device::Result<RegisterValueOutput>
where
    T: Read + Write,
    V: RegisterValue + Serialize + ToString,
{
    let value = session.read(reg)?;
    Ok(RegisterValueOutput::new(reg.name(), reg.address(), &value))
}

#[cfg(unix)]
pub type Handle = inveo_transport::HidStream;

#[cfg(not(unix))]
pub type Handle = std::fs::File;

/// Where and how to reach the reader, from the global flags.
#[derive(Debug, Default)]
pub struct Connection {
    pub device: Option<PathBuf>,
    pub timeout: String,
}

impl Connection {
    pub fn frame_config(&self) -> CliResult<FrameConfig> {
        Ok(FrameConfig {
            read_timeout: Some(parse_timeout(&self.timeout)?),
            ..FrameConfig::default()
        })
    }

    /// Resolve the device node: the explicit path, or a USB id lookup.
    #[cfg(unix)]
    pub fn device_path(&self) -> CliResult<PathBuf> {
        match &self.device {
            Some(path) => Ok(path.clone()),
            None => inveo_transport::find_device(
                inveo_transport::VENDOR_ID,
                inveo_transport::PRODUCT_ID,
            )
            .map_err(|err| crate::exit::transport_error("locate reader", err)),
        }
    }

    #[cfg(unix)]
    pub fn open(&self) -> CliResult<DeviceSession<Handle>> {
        let config = self.frame_config()?;
        let path = self.device_path()?;
        debug!(device = %path.display(), timeout = ?config.read_timeout, "opening reader");
        DeviceSession::open_with_config(&path, config)
            .map_err(|err| device_error(&format!("open {}", path.display()), err))
    }

    #[cfg(not(unix))]
    pub fn open(&self) -> CliResult<DeviceSession<Handle>> {
        self.frame_config()?;
        debug!("hidraw backend unavailable");
        Err(CliError::new(
            crate::exit::TRANSPORT_ERROR,
            "hidraw devices are only supported on Linux",
        ))
    }
}

pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::io::{ErrorKind, Read, Write};

    use inveo_frame::{DEFAULT_RESPONSE_SIZE, END_OF_FRAME, STATUS_OK};

    /// In-memory reader: answers READs from a register store and records
    /// WRITEs into it.
    #[derive(Default)]
    pub struct FakeReader {
        pub registers: HashMap<u16, Vec<u8>>,
        pub requests: Vec<Vec<u8>>,
        pending: Option<Vec<u8>>,
    }

    impl FakeReader {
        pub fn with(mut self, address: u16, payload: &[u8]) -> Self {
            self.registers.insert(address, payload.to_vec());
            self
        }
    }

    impl Write for FakeReader {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.requests.push(buf.to_vec());
            let address = u16::from_be_bytes([buf[2], buf[3]]);
            let mut frame = vec![0u8; DEFAULT_RESPONSE_SIZE];
            frame[0] = STATUS_OK;
            frame[DEFAULT_RESPONSE_SIZE - 1] = END_OF_FRAME;
            if buf[1] == 0 {
                let len = usize::from(buf[4]);
                let mut payload = self.registers.get(&address).cloned().unwrap_or_default();
                payload.resize(len, 0);
                frame[4..4 + len].copy_from_slice(&payload);
            } else if buf.len() == 6 {
                self.registers.insert(address, vec![buf[5]]);
            }
            self.pending = Some(frame);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Read for FakeReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.pending.take() {
                Some(frame) => {
                    buf[..frame.len()].copy_from_slice(&frame);
                    Ok(frame.len())
                }
                None => Err(std::io::Error::from(ErrorKind::TimedOut)),
            }
        }
    }
}
