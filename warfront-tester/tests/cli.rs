use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "warfront-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_warfront-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("frontier"));
}

#[test]
fn cli_json_report_parses_and_passes() {
    let exe = env!("CARGO_BIN_EXE_warfront-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "duel",
            "--seeds",
            "1",
            "--turns",
            "3",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Warfront Self-Play Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(report[0]["scenario_name"], "duel");
    assert_eq!(report[0]["passed"], true);
}

#[test]
fn cli_rejects_unknown_personality() {
    let exe = env!("CARGO_BIN_EXE_warfront-tester");
    let output = Command::new(exe)
        .args(["--personalities", "berserk", "--turns", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
