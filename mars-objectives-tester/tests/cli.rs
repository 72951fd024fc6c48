use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "mars-objectives-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_mars-objectives-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    for key in ["matrix", "exclusion", "synergy", "determinism", "fixed"] {
        assert!(content.contains(key), "missing {key}");
    }
}

#[test]
fn cli_runs_every_scenario_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_mars-objectives-tester");
    let output_path = temp_path("json");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "all",
            "--iterations",
            "2",
            "--seeds",
            "1,0x2A",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mars Objectives Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(report["passed"], true);
    assert_eq!(report["results"].as_array().map(Vec::len), Some(10));
    assert!(report["generated_at"].is_string());
}

#[test]
fn cli_json_digests_repeat_for_the_same_seed() {
    let exe = env!("CARGO_BIN_EXE_mars-objectives-tester");
    let digests: Vec<serde_json::Value> = ["first", "second"]
        .iter()
        .map(|label| {
            let path = temp_path(label);
            let status = Command::new(exe)
                .args([
                    "--report",
                    "json",
                    "--scenarios",
                    "synergy",
                    "--iterations",
                    "3",
                    "--seeds",
                    "99",
                    "--output",
                ])
                .arg(&path)
                .status()
                .expect("run cli");
            assert!(status.success());
            let content = std::fs::read_to_string(path).expect("read output");
            let report: serde_json::Value = serde_json::from_str(&content).expect("valid json");
            report["results"][0]["digest"].clone()
        })
        .collect();
    assert_eq!(digests[0], digests[1]);
}

#[test]
fn cli_markdown_report_uses_config_file() {
    let exe = env!("CARGO_BIN_EXE_mars-objectives-tester");
    let config_path = temp_path("config");
    std::fs::write(
        &config_path,
        r#"{"board":"elysium","expansions":["moon"],"max_attempts":200}"#,
    )
    .expect("write config");
    let output_path = temp_path("markdown");
    let status = Command::new(exe)
        .args([
            "--report",
            "markdown",
            "--scenarios",
            "fixed,exclusion",
            "--iterations",
            "1",
            "--config",
        ])
        .arg(&config_path)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("# Mars Objectives Selection Test Results"));
    assert!(content.contains("Fixed Board Selection"));
    assert!(content.contains("Disabled Content Exclusion"));
}

#[test]
fn cli_rejects_bad_inputs() {
    let exe = env!("CARGO_BIN_EXE_mars-objectives-tester");

    let bad_seed = Command::new(exe)
        .args(["--seeds", "olympus", "--scenarios", "fixed"])
        .output()
        .expect("run cli");
    assert!(!bad_seed.status.success());
    assert!(String::from_utf8_lossy(&bad_seed.stderr).contains("olympus"));

    let missing_config = Command::new(exe)
        .args(["--config"])
        .arg(temp_path("absent"))
        .output()
        .expect("run cli");
    assert!(!missing_config.status.success());
}

#[test]
fn cli_unknown_scenario_runs_nothing() {
    let exe = env!("CARGO_BIN_EXE_mars-objectives-tester");
    let output = Command::new(exe)
        .args(["--scenarios", "olympus-mons"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown scenario"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No scenarios executed."));
}
