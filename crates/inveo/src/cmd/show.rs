use inveo_device::register;
use inveo_device::Snapshot;

use crate::cmd::{Connection, ShowArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_json, print_values, OutputFormat, RegisterValueOutput};

pub fn run(_args: ShowArgs, connection: &Connection, format: OutputFormat) -> CliResult<i32> {
    let session = connection.open()?;
    let snapshot = session
        .snapshot()
        .map_err(|err| device_error("read configuration", err))?;

    match format {
        OutputFormat::Json => print_json(&snapshot),
        OutputFormat::Pretty => print_pretty(&snapshot),
        OutputFormat::Table | OutputFormat::Raw => print_values(&rows(&snapshot), format),
    }
    Ok(SUCCESS)
}

/// One row per register, in address order.
pub fn rows(snapshot: &Snapshot) -> Vec<RegisterValueOutput> {
    fn row<R, A, V: serde::Serialize + ToString>(
        reg: &register::Register<R, A>,
        value: &V,
    ) -> RegisterValueOutput {
        RegisterValueOutput::new(reg.name(), reg.address(), value)
    }

    vec![
        row(&register::MODE, &snapshot.mode),
        row(&register::USB_MODE, &snapshot.usb_mode),
        row(&register::LED1, &snapshot.led1),
        row(&register::LED2, &snapshot.led2),
        row(&register::LED3, &snapshot.led3),
        row(&register::BUZZER, &snapshot.buzzer),
        row(&register::READ_DELAY, &snapshot.read_delay),
        row(&register::MODEL, &snapshot.model),
        row(&register::SOFTWARE_VERSION, &snapshot.software_version),
        row(&register::HARDWARE_VERSION, &snapshot.hardware_version),
        RegisterValueOutput::optional(
            register::LAST_TAG.name(),
            register::LAST_TAG.address(),
            snapshot.last_tag.as_ref(),
        ),
    ]
}

fn print_pretty(snapshot: &Snapshot) {
    println!("Current configuration:");
    println!("\tMode: {}", snapshot.mode);
    println!("\tUSB mode: {}", snapshot.usb_mode);
    println!("\tLED 1: {}", snapshot.led1);
    println!("\tLED 2: {}", snapshot.led2);
    println!("\tLED 3: {}", snapshot.led3);
    println!("\tBuzzer: {}", snapshot.buzzer);
    println!("\tRead delay: {}", snapshot.read_delay);
    println!("\tModel: {}", snapshot.model);
    println!("\tSoftware version: {}", snapshot.software_version);
    println!("\tHardware version: {}", snapshot.hardware_version);
    match &snapshot.last_tag {
        Some(tag) => println!("\tLast tag: {tag}"),
        None => println!("\tLast tag: None"),
    }
}
