use assert_cmd::Command;

fn happa_smoke() -> Command {
    let mut cmd = Command::cargo_bin("happa-smoke").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let output = happa_smoke().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["run", "api", "pods"] {
        assert!(stdout.contains(command), "missing '{}' in:\n{}", command, stdout);
    }
}

#[test]
fn missing_kubeconfig_fails() {
    let output = happa_smoke()
        .args(["--kubeconfig", "/nonexistent/kubeconfig.yaml", "api"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unable to create client from path"),
        "{}",
        stderr
    );
}

#[test]
fn bad_settings_fail() {
    let output = happa_smoke()
        .env("HAPPA_SMOKE_READY_TIMEOUT_SECS", "soon")
        .arg("pods")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to read settings"), "{}", stderr);
}

#[test]
fn api_ignores_pod_settings() {
    let output = happa_smoke()
        .env("HAPPA_SMOKE_READY_TIMEOUT_SECS", "soon")
        .args(["--kubeconfig", "/nonexistent/kubeconfig.yaml", "api"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Unable to read settings"), "{}", stderr);
    assert!(
        stderr.contains("Unable to create client from path"),
        "{}",
        stderr
    );
}

#[cfg(feature = "integ")]
#[test]
fn run_against_cluster() {
    let output = happa_smoke().args(["--json", "run"]).output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(output.status.success(), "{}", report);
    let results = report.get("results").unwrap().as_array().unwrap();
    assert_eq!(results.len(), 2);
    for result in results {
        assert_eq!(result.get("passed").unwrap(), &serde_json::Value::Bool(true));
    }
}
