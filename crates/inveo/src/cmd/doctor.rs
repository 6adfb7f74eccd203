use serde::Serialize;

use crate::cmd::{Connection, DoctorArgs};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, connection: &Connection, format: OutputFormat) -> CliResult<i32> {
    let mut checks = vec![hidraw_class_check()];
    checks.extend(device_checks(connection));
    checks.push(compiled_features_check());

    let has_fail = checks.iter().any(|c| c.status == CheckStatus::Fail);
    let output = DoctorOutput {
        checks,
        overall: if has_fail { "fail" } else { "pass" },
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("inveo doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<18} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

fn hidraw_class_check() -> CheckResult {
    const CLASS_DIR: &str = "/sys/class/hidraw";

    if cfg!(not(unix)) {
        return CheckResult::new(
            "hidraw_class",
            CheckStatus::Fail,
            "hidraw backend unavailable on this platform",
        );
    }

    if std::path::Path::new(CLASS_DIR).is_dir() {
        CheckResult::new("hidraw_class", CheckStatus::Pass, format!("{CLASS_DIR} present"))
    } else {
        CheckResult::new(
            "hidraw_class",
            CheckStatus::Fail,
            format!("{CLASS_DIR} missing (is the hidraw driver loaded?)"),
        )
    }
}

#[cfg(unix)]
fn device_checks(connection: &Connection) -> Vec<CheckResult> {
    let mut checks = Vec::new();

    let path = match connection.device_path() {
        Ok(path) => {
            checks.push(CheckResult::new(
                "device_located",
                CheckStatus::Pass,
                path.display().to_string(),
            ));
            path
        }
        Err(err) => {
            checks.push(CheckResult::new("device_located", CheckStatus::Fail, err.message));
            checks.push(CheckResult::new(
                "device_responds",
                CheckStatus::Skip,
                "no device",
            ));
            return checks;
        }
    };

    let session = match connection.open() {
        Ok(session) => session,
        Err(err) => {
            checks.push(CheckResult::new("device_responds", CheckStatus::Fail, err.message));
            return checks;
        }
    };

    let identity = session
        .model()
        .and_then(|model| Ok((model, session.software_version()?)));
    match identity {
        Ok((model, software)) => checks.push(CheckResult::new(
            "device_responds",
            CheckStatus::Pass,
            format!("{model}, software {software} at {}", path.display()),
        )),
        Err(err) => checks.push(CheckResult::new(
            "device_responds",
            CheckStatus::Fail,
            err.to_string(),
        )),
    }
    checks
}

#[cfg(not(unix))]
fn device_checks(_connection: &Connection) -> Vec<CheckResult> {
    vec![CheckResult::new(
        "device_located",
        CheckStatus::Skip,
        "hidraw backend unavailable",
    )]
}

fn compiled_features_check() -> CheckResult {
    let mut features = Vec::new();
    if cfg!(feature = "cli") {
        features.push("cli");
    }
    if cfg!(unix) {
        features.push("hidraw");
    }

    CheckResult::new("compiled_features", CheckStatus::Info, features.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_output_has_overall_status() {
        let output = DoctorOutput {
            checks: vec![CheckResult::new("x", CheckStatus::Pass, "ok")],
            overall: "pass",
        };
        let json = serde_json::to_string(&output).expect("doctor output should serialize");
        assert!(json.contains("\"overall\":\"pass\""));
        assert!(json.contains("\"status\":\"pass\""));
    }

    #[cfg(unix)]
    #[test]
    fn missing_device_fails_open_check() {
        let connection = Connection {
            device: Some("/nonexistent/hidraw99".into()),
            timeout: "1s".to_string(),
        };
        let checks = device_checks(&connection);
        assert_eq!(checks[0].status, CheckStatus::Pass);
        assert_eq!(checks[1].name, "device_responds");
        assert_eq!(checks[1].status, CheckStatus::Fail);
        assert!(checks[1].detail.contains("/nonexistent/hidraw99"));
    }
}
