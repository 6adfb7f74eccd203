mod cmd;
mod exit;
mod logging;
mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::{Command, Connection};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "inveo", version, about = "Inveo RFID/NFC reader control")]
struct Cli {
    /// hidraw device node. Default: locate the reader by its USB ids.
    #[arg(long, short = 'd', value_name = "PATH", env = "INVEO_DEVICE", global = true)]
    device: Option<PathBuf>,

    /// Maximum time to wait for each response (e.g. 2s, 500ms).
    #[arg(long, value_name = "DURATION", default_value = "2s", global = true)]
    timeout: String,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let connection = Connection {
        device: cli.device,
        timeout: cli.timeout,
    };
    let result = cmd::run(cli.command, &connection, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_subcommand() {
        let cli = Cli::try_parse_from(["inveo", "set", "led2", "on-read"])
            .expect("set args should parse");

        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.register, cmd::SettableRegister::Led2);
                assert_eq!(args.value, "on-read");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_device_after_subcommand() {
        let cli = Cli::try_parse_from(["inveo", "show", "--device", "/dev/hidraw3"])
            .expect("show args should parse");
        assert_eq!(cli.device, Some(PathBuf::from("/dev/hidraw3")));
        assert!(matches!(cli.command, Command::Show(_)));
    }

    #[test]
    fn rejects_unknown_register() {
        let err = Cli::try_parse_from(["inveo", "get", "led9"])
            .expect_err("unknown register should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn rejects_write_to_read_only_register() {
        let err = Cli::try_parse_from(["inveo", "set", "model", "usb-dual"])
            .expect_err("read-only register should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn parses_get_with_timeout() {
        let cli = Cli::try_parse_from(["inveo", "--timeout", "500ms", "get", "last-tag"])
            .expect("get args should parse");
        assert_eq!(cli.timeout, "500ms");
        assert!(matches!(cli.command, Command::Get(_)));
    }
}
