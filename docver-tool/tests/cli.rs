use std::{fs, process::Command};

fn docver() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docver"))
}

#[test]
fn schema_ignores_broken_config() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join(".docver.toml"), "base_url = [unclosed").unwrap();

    let out = docver()
        .arg("-C")
        .arg(root.path())
        .arg("schema")
        .output()
        .unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let schema = String::from_utf8(out.stdout).unwrap();
    assert!(schema.contains("base_url"));
}

#[test]
fn other_commands_report_broken_config() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join(".docver.toml"), "base_url = [unclosed").unwrap();

    let out = docver()
        .arg("-C")
        .arg(root.path())
        .args(["scan", "html"])
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid config file"));
}
