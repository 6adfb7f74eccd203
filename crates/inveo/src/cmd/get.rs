use crate::cmd::{arg_name, read_register, Connection, GetArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_values, OutputFormat};

pub fn run(args: GetArgs, connection: &Connection, format: OutputFormat) -> CliResult<i32> {
    let session = connection.open()?;
    let value = read_register(&session, args.register)
        .map_err(|err| device_error(&format!("read {}", arg_name(&args.register)), err))?;

    print_values(&[value], format);
    Ok(SUCCESS)
}
