use std::io::{Read, Write};

use inveo_device::register::{self, LedChannel};
use inveo_device::{BuzzerMode, DeviceSession, LedMode, ReadDelay, UsbMode};
use tracing::info;

use crate::cmd::{Connection, SetArgs, SettableRegister};
use crate::exit::{device_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_values, OutputFormat, RegisterValueOutput};

/// A validated write, parsed before the device is opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingWrite {
    UsbMode(UsbMode),
    Led(LedChannel, LedMode),
    Buzzer(BuzzerMode),
    ReadDelay(ReadDelay),
}

impl PendingWrite {
    pub fn parse(target: SettableRegister, input: &str) -> CliResult<Self> {
        fn usage(err: impl std::fmt::Display) -> CliError {
            CliError::new(USAGE, err.to_string())
        }

        let led = |channel| input.parse().map(|mode| Self::Led(channel, mode));
        match target {
            SettableRegister::UsbMode => input.parse().map(Self::UsbMode).map_err(usage),
            SettableRegister::Led1 => led(LedChannel::One).map_err(usage),
            SettableRegister::Led2 => led(LedChannel::Two).map_err(usage),
            SettableRegister::Led3 => led(LedChannel::Three).map_err(usage),
            SettableRegister::Buzzer => input.parse().map(Self::Buzzer).map_err(usage),
            SettableRegister::ReadDelay => input.parse().map(Self::ReadDelay).map_err(usage),
        }
    }

    pub fn apply<T: Read + Write>(
        self,
        session: &DeviceSession<T>,
    ) -> inveo_device::Result<RegisterValueOutput> {
        match self {
            Self::UsbMode(mode) => {
                session.set_usb_mode(mode)?;
                Ok(written(&register::USB_MODE, &mode))
            }
            Self::Led(channel, mode) => {
                session.set_led_mode(channel, mode)?;
                Ok(written(&channel.register(), &mode))
            }
            Self::Buzzer(mode) => {
                session.set_buzzer_mode(mode)?;
                Ok(written(&register::BUZZER, &mode))
            }
            Self::ReadDelay(delay) => {
                session.set_read_delay(delay)?;
                Ok(written(&register::READ_DELAY, &delay))
            }
        }
    }
}

fn written<V: serde::Serialize + ToString, A>(
    reg: &register::Register<V, A>,
    value: &V,
) -> RegisterValueOutput {
    info!(register = reg.name(), value = %value.to_string(), "register written");
    RegisterValueOutput::new(reg.name(), reg.address(), value)
}

pub fn run(args: SetArgs, connection: &Connection, format: OutputFormat) -> CliResult<i32> {
    let pending = PendingWrite::parse(args.register, &args.value)?;
    let session = connection.open()?;
    let output = pending
        .apply(&session)
        .map_err(|err| device_error("write register", err))?;

    print_values(&[output], format);
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::FakeReader;

    #[test]
    fn parses_each_value_type() {
        assert_eq!(
            PendingWrite::parse(SettableRegister::UsbMode, "virtual-serial").unwrap(),
            PendingWrite::UsbMode(UsbMode::VirtualSerial)
        );
        assert_eq!(
            PendingWrite::parse(SettableRegister::Led3, "ON_PROXIMITY").unwrap(),
            PendingWrite::Led(LedChannel::Three, LedMode::OnProximity)
        );
        assert_eq!(
            PendingWrite::parse(SettableRegister::Buzzer, "off").unwrap(),
            PendingWrite::Buzzer(BuzzerMode::Off)
        );
        assert_eq!(
            PendingWrite::parse(SettableRegister::ReadDelay, "0.5s").unwrap(),
            PendingWrite::ReadDelay(ReadDelay::from_multiplier(5))
        );
    }

    #[test]
    fn invalid_values_are_usage_errors() {
        let err = PendingWrite::parse(SettableRegister::Led1, "blink").unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("on-read"), "{}", err.message);

        let err = PendingWrite::parse(SettableRegister::ReadDelay, "300").unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn apply_writes_selected_register_only() {
        let session = DeviceSession::new(FakeReader::default());
        let out = PendingWrite::Led(LedChannel::Two, LedMode::OnRead)
            .apply(&session)
            .unwrap();
        assert_eq!(out.register, "led2");
        assert_eq!(out.display, "on-read");

        let reader = session.close();
        assert_eq!(reader.requests, vec![vec![0x00, 0x01, 0x00, 0x03, 0x01, 0x02]]);
        assert_eq!(reader.registers.len(), 1);
    }
}
