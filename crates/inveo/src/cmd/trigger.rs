use serde::Serialize;
use tracing::info;

use crate::cmd::Connection;
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{format_address, print_json, OutputFormat};

/// Write-only device actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Beep,
    Reset,
}

impl Trigger {
    fn name(self) -> &'static str {
        match self {
            Trigger::Beep => "beep",
            Trigger::Reset => "reset",
        }
    }

    fn address(self) -> u16 {
        match self {
            Trigger::Beep => inveo_device::register::BEEP,
            Trigger::Reset => inveo_device::register::RESET,
        }
    }
}

#[derive(Debug, Serialize)]
struct TriggerOutput {
    action: &'static str,
    address: String,
    status: &'static str,
}

pub fn run(trigger: Trigger, connection: &Connection, format: OutputFormat) -> CliResult<i32> {
    let session = connection.open()?;
    let result = match trigger {
        Trigger::Beep => session.beep(),
        Trigger::Reset => session.reset(),
    };
    result.map_err(|err| device_error(trigger.name(), err))?;
    info!(action = trigger.name(), "trigger sent");

    let output = TriggerOutput {
        action: trigger.name(),
        address: format_address(trigger.address()),
        status: "ok",
    };
    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table | OutputFormat::Pretty => match trigger {
            Trigger::Beep => println!("beep sent"),
            Trigger::Reset => println!("reset sent; the reader will re-enumerate"),
        },
        OutputFormat::Raw => println!("{}", output.status),
    }
    Ok(SUCCESS)
}
