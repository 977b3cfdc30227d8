use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("libris-cli")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("check-config"));
}

#[test]
fn check_config_reports_defaults_without_secrets() {
    let output = Command::cargo_bin("libris-cli")
        .unwrap()
        .arg("check-config")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("books.json"));
    assert!(!stdout.contains("admin123"));
}
