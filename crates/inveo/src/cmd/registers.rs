use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use inveo_device::{RegisterInfo, REGISTERS};

use crate::exit::{CliResult, SUCCESS};
use crate::output::{format_address, print_json, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    match format {
        OutputFormat::Json => print_json(&REGISTERS),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["REGISTER", "ADDRESS", "LENGTH", "KIND", "ACCESS"]);
            for info in &REGISTERS {
                table.add_row(vec![
                    info.name.to_string(),
                    format_address(info.address),
                    info.read_len.to_string(),
                    info.kind.to_string(),
                    access(info).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for info in &REGISTERS {
                println!(
                    "{:<18} {} {:>2} {:<3} {}",
                    info.name,
                    format_address(info.address),
                    info.read_len,
                    access(info),
                    info.kind
                );
            }
        }
        OutputFormat::Raw => {
            for info in &REGISTERS {
                println!("{}", info.name);
            }
        }
    }
    Ok(SUCCESS)
}

fn access(info: &RegisterInfo) -> &'static str {
    if info.writable {
        "rw"
    } else {
        "r"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_map_serializes() {
        let json = serde_json::to_value(REGISTERS).expect("register map should serialize");
        let rows = json.as_array().expect("array");
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[2]["name"], "led1");
        assert_eq!(rows[2]["address"], 2);
        assert_eq!(rows[2]["writable"], true);
        assert_eq!(rows[10]["read_len"], 18);
        assert_eq!(rows[10]["kind"], "tag-id");
    }

    #[test]
    fn access_labels() {
        assert_eq!(access(&REGISTERS[0]), "r");
        assert_eq!(access(&REGISTERS[1]), "rw");
    }
}
