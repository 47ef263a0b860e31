//! Runs the `estatboard` binary against recorded API responses.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn estatboard(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_estatboard"))
        .args(args)
        .env("HOME", home)
        .env("RUST_LOG", "off")
        .env_remove("ESTATBOARD_API_URL")
        .env_remove("ESTATBOARD_API_TOKEN")
        .output()
        .expect("failed to run estatboard")
}

fn setup() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[api]\nbase_url = \"http://127.0.0.1:9/api\"\n\n[aggregation]\ncutoff = 3\n",
    )
    .unwrap();
    let config = config.display().to_string();
    (dir, config)
}

fn write_fixture(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

#[test]
fn test_rooms_table_from_fixture() {
    let (dir, config) = setup();
    let input = write_fixture(
        dir.path(),
        "flats.json",
        r#"[
            {"_count": 6, "roomCount": 0, "author": "owner"},
            {"_count": 2, "roomCount": 3, "author": "agency"},
            {"_count": 2, "roomCount": 8, "author": "agency"}
        ]"#,
    );

    let output = estatboard(
        dir.path(),
        &["--config", &config, "rooms", "--kind", "flat", "--input", &input],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Студия"));
    assert!(stdout.contains("Квартира 3-ком.+"));
    assert!(stdout.contains("Собственник 60.0%, Агентство 40.0%"));
}

#[test]
fn test_rooms_cutoff_flag_overrides_config() {
    let (dir, config) = setup();
    let input = write_fixture(
        dir.path(),
        "flats.json",
        r#"[{"_count": 1, "roomCount": 5, "author": "owner"}]"#,
    );

    let output = estatboard(
        dir.path(),
        &[
            "--config", &config, "rooms", "--kind", "flat", "--cutoff", "5", "--input", &input,
            "--format", "json",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["table"]["cutoff"], 5);
    assert_eq!(value["table"]["rows"].as_array().unwrap().len(), 6);
    assert_eq!(value["summary"]["grandTotal"], 1);
}

#[test]
fn test_invalid_input_fails() {
    let (dir, config) = setup();
    let input = write_fixture(
        dir.path(),
        "broken.json",
        r#"[{"roomCount": 1, "author": "owner"}]"#,
    );

    let output = estatboard(
        dir.path(),
        &["--config", &config, "rooms", "--kind", "flat", "--input", &input],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("_count"));
}

#[test]
fn test_domains_json() {
    let (dir, config) = setup();
    let input = write_fixture(
        dir.path(),
        "domains.json",
        r#"[{"_count": 1, "domain": "cian.ru"}, {"_count": 3, "domain": "avito.ru"}]"#,
    );

    let output = estatboard(
        dir.path(),
        &["--config", &config, "domains", "--input", &input, "--format", "json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["domain"], "avito.ru");
    assert_eq!(value[0]["percentage"], 75.0);
}

#[test]
fn test_activity_table() {
    let (dir, config) = setup();
    let input = write_fixture(
        dir.path(),
        "activity.json",
        r#"[{"_count": 4, "weekday": 5, "hour": 18}]"#,
    );

    let output = estatboard(
        dir.path(),
        &["--config", &config, "activity", "--kind", "house", "--input", &input],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("пик: Пт и 18:00"));
}

#[test]
fn test_init_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("estatboard.toml");
    let path_arg = path.display().to_string();

    let output = estatboard(dir.path(), &["init-config", "--path", &path_arg]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[aggregation]"));

    let again = estatboard(dir.path(), &["init-config", "--path", &path_arg]);
    assert!(!again.status.success());
}
