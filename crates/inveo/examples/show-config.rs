//! Print the current configuration of the attached reader.
//!
//! Run with:
//!   cargo run --example show-config
//!   cargo run --example show-config -- /dev/hidraw3

use std::time::Duration;

use inveo::device::DeviceSession;
use inveo::frame::FrameConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = FrameConfig {
        read_timeout: Some(Duration::from_secs(2)),
        ..FrameConfig::default()
    };
    let dev = match std::env::args_os().nth(1) {
        Some(path) => DeviceSession::open_with_config(path, config)?,
        None => DeviceSession::open_default(config)?,
    };

    println!("Current configuration:");
    println!("\tMode: {}", dev.mode()?);
    println!("\tUSB mode: {}", dev.usb_mode()?);
    println!("\tLED 1: {}", dev.led1_mode()?);
    println!("\tLED 2: {}", dev.led2_mode()?);
    println!("\tLED 3: {}", dev.led3_mode()?);
    println!("\tBuzzer: {}", dev.buzzer_mode()?);
    println!("\tRead delay: {}", dev.read_delay()?);
    println!("\tModel: {}", dev.model()?);
    println!("\tSoftware version: {}", dev.software_version()?);
    println!("\tHardware version: {}", dev.hardware_version()?);
    match dev.last_tag()? {
        Some(tag) => println!("\tLast tag: {tag}"),
        None => println!("\tLast tag: None"),
    }
    Ok(())
}
