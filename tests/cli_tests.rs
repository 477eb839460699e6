//! CLI integration tests.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "Open,Close,Symbol,Profit,Trade duration in seconds\n";

/// Three trades: +100 in New York, -50 in London, +25 out of session.
const THREE_TRADES: &str = "\
04/09/2023 12:30,04/09/2023 13:00,EURUSD,100,1800
05/09/2023 07:30,05/09/2023 08:00,GBPUSD,-50,1800
05/09/2023 21:30,05/09/2023 22:00,XAUUSD,25,1800
";

fn tradelens(workdir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("tradelens");
    cmd.current_dir(workdir.path()).env_remove("RUST_LOG");
    cmd
}

fn write_export(dir: &TempDir, rows: &str) -> PathBuf {
    let path = dir.path().join("trades.csv");
    fs::write(&path, format!("{HEADER}{rows}")).expect("write trade export");
    path
}

#[test]
fn report_prints_the_dashboard() {
    let dir = TempDir::new().unwrap();
    let export = write_export(&dir, THREE_TRADES);

    tradelens(&dir)
        .args(["report", "--balance", "1000", "--file"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Key Metrics"))
        .stdout(predicate::str::contains("£75.00"))
        .stdout(predicate::str::contains("66.67%"))
        .stdout(predicate::str::contains("+7.50%"))
        .stdout(predicate::str::contains("Tuesday"))
        .stdout(predicate::str::contains("Worst Trading Pair: GBPUSD"))
        .stdout(predicate::str::contains("Best Trading Session: New York"));
}

#[test]
fn report_shows_placeholder_for_empty_export() {
    let dir = TempDir::new().unwrap();
    let export = write_export(&dir, "05/09/2023 09:00,05/09/2023 08:00,GBPUSD,-50,1800\n");

    tradelens(&dir)
        .args(["report", "--file"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("No trades to analyse"))
        .stdout(predicate::str::contains("1 malformed record(s)"));
}

#[test]
fn report_uses_config_file_settings() {
    let dir = TempDir::new().unwrap();
    let export = write_export(&dir, THREE_TRADES);
    let config = dir.path().join("tradelens.toml");
    fs::write(
        &config,
        format!(
            "[dashboard]\nstarting_balance = \"1000\"\ncurrency_symbol = \"$\"\n\n[data]\npath = {:?}\n",
            export.display().to_string()
        ),
    )
    .unwrap();

    // Picked up from the working directory without --config.
    tradelens(&dir)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("$75.00"))
        .stdout(predicate::str::contains("$1,075.00"));
}

#[test]
fn export_writes_json() {
    let dir = TempDir::new().unwrap();
    let export = write_export(&dir, THREE_TRADES);
    let output = dir.path().join("report.json");

    tradelens(&dir)
        .args(["export", "--balance", "1000", "--file"])
        .arg(&export)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["key"]["total_pnl"], "75");
    assert_eq!(json["key"]["total_trades"], 3);
    assert_eq!(json["key"]["most_traded_symbol"], "EURUSD");
    assert_eq!(
        json["balance_curve"],
        serde_json::json!(["1100", "1050", "1075"])
    );
    assert_eq!(json["session_breakdown"][0]["key"], "New York");
    assert_eq!(json["session_breakdown"][2]["key"], "London");
    assert!(json["additional"]["average_loss"].is_string());
}

#[test]
fn missing_export_fails() {
    let dir = TempDir::new().unwrap();

    tradelens(&dir)
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No trade export given"));

    tradelens(&dir)
        .args(["report", "--file", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.csv"));
}

#[test]
fn sessions_lists_the_hour_map() {
    let dir = TempDir::new().unwrap();

    tradelens(&dir)
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00"))
        .stdout(predicate::str::contains("Out of Session"))
        .stdout(predicate::str::contains("New York"));
}

#[test]
fn loaded_configuration_reaches_the_log() {
    let dir = TempDir::new().unwrap();

    tradelens(&dir)
        .env("RUST_LOG", "debug")
        .args(["--log-format", "json", "sessions"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration loaded"))
        .stdout(predicate::str::contains("Configuration loaded").not());
}

#[test]
fn pretty_log_format_shows_source_locations() {
    let dir = TempDir::new().unwrap();

    tradelens(&dir)
        .env("RUST_LOG", "debug")
        .env("NO_COLOR", "1")
        .args(["--log-format", "pretty", "sessions"])
        .assert()
        .success()
        .stderr(predicate::str::contains("src/main.rs:"));
}
