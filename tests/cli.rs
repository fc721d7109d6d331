//! CLI integration tests.

use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pizza-kitchen"))
}

#[test]
fn virtual_run_prints_summary() {
    let output = bin()
        .args(["run", "--virtual", "--seed", "3", "--orders", "6"])
        .output()
        .expect("failed to run kitchen binary");

    assert!(
        output.status.success(),
        "run exited with non-zero status: {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("KITCHEN SUMMARY"), "summary missing");
    let done_line = stdout
        .lines()
        .find(|line| line.starts_with("orders_done="))
        .expect("orders_done line missing");
    assert_eq!(done_line.trim(), "orders_done=6");
    assert_eq!(
        stdout.lines().filter(|l| l.starts_with("station=")).count(),
        4
    );
}

#[test]
fn json_report_is_parseable() {
    let output = bin()
        .args(["run", "--virtual", "--json", "--seed", "11"])
        .output()
        .expect("failed to run kitchen binary");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("report is not JSON");
    assert_eq!(report["orders_done"], 10);
    assert_eq!(report["completed"], true);
}

#[test]
fn generate_config_emits_defaults() {
    let output = bin()
        .arg("generate-config")
        .output()
        .expect("failed to run kitchen binary");
    assert!(output.status.success());

    let config: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("config is not JSON");
    assert_eq!(config["orders"], 10);
    assert_eq!(config["stations"][2]["name"], "oven");
    assert_eq!(config["stations"][1]["scaling"], "per_topping");
}

#[test]
fn invalid_override_fails() {
    let output = bin()
        .args(["run", "--virtual", "--orders", "0"])
        .output()
        .expect("failed to run kitchen binary");
    assert!(!output.status.success());
}
