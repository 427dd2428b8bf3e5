use std::fs;
use std::process::Command;

fn docaudit() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docaudit"))
}

#[test]
fn strict_mode_fails_on_non_compliant_corpus() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("01-bare.md"), "# 제목\n\n본문\n").unwrap();

    let output = docaudit()
        .args(["--dir", dir.path().to_str().unwrap(), "--strict"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("01-bare.md"));
}

#[test]
fn report_is_written_as_yaml() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("01-bare.md"), "## 목차\n").unwrap();
    let report_path = dir.path().join("report.yaml");

    let status = docaudit()
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "--output",
            report_path.to_str().unwrap(),
            "--format",
            "yaml",
        ])
        .status()
        .unwrap();

    assert!(status.success());
    let text = fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("filename: 01-bare.md"));
}

#[test]
fn malformed_schema_aborts_before_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("01-a.md"), "## 목차\n").unwrap();
    let schema = dir.path().join("schema.yaml");
    fs::write(
        &schema,
        "checklist:\n  - id: faq\n    text: FAQ\n    min_count: 3\n",
    )
    .unwrap();

    let output = docaudit()
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "--config",
            schema.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("01-a.md"));
}

#[test]
fn show_schema_prints_yaml_and_exits() {
    let output = docaudit().arg("--show-schema").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("section_boundary"));
    assert!(stdout.contains("checklist:"));
}
