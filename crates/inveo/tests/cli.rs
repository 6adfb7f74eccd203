#![cfg(all(unix, feature = "cli"))]

use std::process::Command;

fn inveo() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_inveo"));
    cmd.env_remove("INVEO_DEVICE").arg("--log-level").arg("error");
    cmd
}

#[test]
fn registers_json_lists_register_map() {
    let output = inveo()
        .args(["--format", "json", "registers"])
        .output()
        .expect("registers command should run");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let rows: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let names: Vec<_> = rows
        .as_array()
        .expect("array")
        .iter()
        .map(|row| row["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "mode",
            "usb-mode",
            "led1",
            "led2",
            "led3",
            "buzzer",
            "read-delay",
            "model",
            "software-version",
            "hardware-version",
            "last-tag"
        ]
    );
}

#[test]
fn show_missing_device_is_transport_error() {
    let output = inveo()
        .args(["--device", "/nonexistent/hidraw42", "show"])
        .output()
        .expect("show command should run");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/hidraw42"), "stderr: {stderr}");
}

#[test]
fn device_path_from_environment() {
    let output = inveo()
        .env("INVEO_DEVICE", "/nonexistent/hidraw7")
        .args(["get", "led1"])
        .output()
        .expect("get command should run");

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/hidraw7"));
}

#[test]
fn invalid_set_value_fails_before_opening_device() {
    let output = inveo()
        .args(["--device", "/nonexistent/hidraw42", "set", "buzzer", "loud"])
        .output()
        .expect("set command should run");

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid buzzer mode 'loud'"), "stderr: {stderr}");
}

#[test]
fn invalid_timeout_is_usage_error() {
    let output = inveo()
        .args(["--timeout", "0s", "--device", "/nonexistent/hidraw42", "beep"])
        .output()
        .expect("beep command should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = inveo().arg("version").output().expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("inveo {}", env!("CARGO_PKG_VERSION")));
}
