use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One register and its decoded value, as printed by `get` and `show`.
#[derive(Debug, Serialize)]
pub struct RegisterValueOutput {
    pub register: &'static str,
    pub address: String,
    pub value: serde_json::Value,
    /// Human form of `value`; omitted from JSON.
    #[serde(skip)]
    pub display: String,
}

impl RegisterValueOutput {
    pub fn new<V: Serialize + ToString>(register: &'static str, address: u16, value: &V) -> Self {
        Self {
            register,
            address: format_address(address),
            value: serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            display: value.to_string(),
        }
    }

    pub fn optional<V: Serialize + ToString>(
        register: &'static str,
        address: u16,
        value: Option<&V>,
    ) -> Self {
        match value {
            Some(value) => Self::new(register, address, value),
            None => Self {
                register,
                address: format_address(address),
                value: serde_json::Value::Null,
                display: "none".to_string(),
            },
        }
    }
}

pub fn format_address(address: u16) -> String {
    format!("{address:#06x}")
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_values(values: &[RegisterValueOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => match values {
            [single] => print_json(single),
            _ => print_json(&values),
        },
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["REGISTER", "ADDRESS", "VALUE"]);
            for value in values {
                table.add_row(vec![
                    value.register.to_string(),
                    value.address.clone(),
                    value.display.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for value in values {
                println!("{:<18} {}", value.register, value.display);
            }
        }
        OutputFormat::Raw => {
            for value in values {
                println!("{}", value.display);
            }
        }
    }
}
