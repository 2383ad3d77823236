//! Exit-code behaviour of the `thumbgen` binary

use std::process::Command;

fn thumbgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_thumbgen"))
}

#[test]
fn no_mode_prints_usage_and_succeeds() {
    let out = thumbgen().output().expect("run thumbgen");
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage:"), "{}", stdout);
    assert!(stdout.contains("under --root"), "{}", stdout);
    assert!(stdout.contains("current directory"), "{}", stdout);
}

#[test]
fn unknown_template_exits_with_one() {
    let root = tempfile::TempDir::new().unwrap();
    let out = thumbgen()
        .arg("--root")
        .arg(root.path())
        .args(["-t", "nonexistent"])
        .output()
        .expect("run thumbgen");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Template not found: nonexistent"), "{}", stderr);
}

#[test]
fn malformed_config_exits_with_one() {
    let root = tempfile::TempDir::new().unwrap();
    let config = root.path().join("thumb.yaml");
    std::fs::write(&config, "output:\n  width: wide\n").unwrap();
    let out = thumbgen()
        .arg("--root")
        .arg(root.path())
        .arg("-c")
        .arg(&config)
        .output()
        .expect("run thumbgen");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Invalid config"), "{}", stderr);
}
