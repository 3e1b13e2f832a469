use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GERMERING_FAX: &str = "Alarmfax der ILS Fürstenfeldbruck
E - Nr 2020-0305-17
Einsatzort: Sporthalle
Straße: Kirchenstraße 5
Einsatzstichwort: B 3
FF Germering
FL Germering 40/1 (DLK 23/12)
";

const LAYOUT: &str = r#"{
    "sections": [
        {
            "text": "EINSATZORT",
            "contained": true,
            "location": { "target": "Einsatzort" }
        },
        {
            "text": "BEMERKUNG",
            "areas": { "Hinweis": "Comment" }
        }
    ]
}"#;

/// Command with an empty config file so the user's own config is never read.
fn alarmfax(dir: &TempDir) -> Command {
    let config = dir.path().join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }
    let mut cmd = Command::cargo_bin("alarmfax").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn write(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn parsers_lists_aliases() {
    let dir = TempDir::new().unwrap();
    alarmfax(&dir)
        .arg("parsers")
        .assert()
        .success()
        .stdout(predicate::str::contains("ILSAugsburgParser"))
        .stdout(predicate::str::contains("LSTKleveParser"))
        .stdout(predicate::str::contains("GenericParser"));
}

#[test]
fn parse_writes_json() {
    let dir = TempDir::new().unwrap();
    let fax = write(dir.path(), "fax.txt", GERMERING_FAX);

    alarmfax(&dir)
        .args(["parse", "--parser", "ILSFFBGermeringParser"])
        .arg(&fax)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""operation_number": "2020-0305-17""#))
        .stdout(predicate::str::contains(r#""emergency_keyword": "B 3""#))
        .stdout(predicate::str::contains("DLK 23/12"));
}

#[test]
fn parse_decodes_legacy_encoding() {
    let dir = TempDir::new().unwrap();
    let fax = write(dir.path(), "fax.txt", b"Stra\xdfe: M\xfchlweg 5\r\n\x0cOrtsteil/Ort: Germering\r\n");

    alarmfax(&dir)
        .args(["parse", "--parser", "ILSFFBGermeringParser"])
        .arg(&fax)
        .assert()
        .success()
        .stdout(predicate::str::contains("Muehlweg 5"))
        .stdout(predicate::str::contains(r#""city": "Germering""#));
}

#[test]
fn parse_text_format_to_file() {
    let dir = TempDir::new().unwrap();
    let fax = write(dir.path(), "fax.txt", GERMERING_FAX);
    let out = dir.path().join("out.txt");

    alarmfax(&dir)
        .args(["parse", "--parser", "ILSFFBGermeringParser", "--format", "text", "-o"])
        .arg(&out)
        .arg(&fax)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("Operation: 2020-0305-17\n"));
    assert!(text.contains("  - 40/1 (DLK 23/12)\n"));
}

#[test]
fn parse_with_layout_file() {
    let dir = TempDir::new().unwrap();
    let layout = write(dir.path(), "layout.json", LAYOUT);
    let fax = write(
        dir.path(),
        "fax.txt",
        "Kopfzeile\nEINSATZORT\nOrt: 86150 Augsburg\nBEMERKUNG\nHinweis: Zufahrt Nord\n",
    );

    alarmfax(&dir)
        .arg("parse")
        .arg("--layout")
        .arg(&layout)
        .arg(&fax)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""zip_code": "86150""#))
        .stdout(predicate::str::contains(r#""comment": "Zufahrt Nord""#));
}

#[test]
fn parse_unknown_parser_fails() {
    let dir = TempDir::new().unwrap();
    let fax = write(dir.path(), "fax.txt", GERMERING_FAX);

    alarmfax(&dir)
        .args(["parse", "--parser", "NoSuchParser"])
        .arg(&fax)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown parser alias: NoSuchParser"));
}

#[test]
fn parse_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    alarmfax(&dir)
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let inbox = dir.path().join("inbox");
    fs::create_dir(&inbox).unwrap();
    write(&inbox, "a.txt", GERMERING_FAX);
    write(&inbox, "b.txt", "E - Nr 2020-0305-18\nFF Germering\n");
    let out = dir.path().join("out");

    alarmfax(&dir)
        .args(["batch", "--parser", "ILSFFBGermeringParser", "--summary", "-j", "2", "-o"])
        .arg(&out)
        .arg(format!("{}/*.txt", inbox.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files to process"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,operation_number,"));
    assert!(summary.contains("a.txt,success,2020-0305-17,"));
    assert!(summary.contains("b.txt,success,2020-0305-18,"));
}

#[test]
fn batch_keeps_outputs_with_shared_stems() {
    let dir = TempDir::new().unwrap();
    let inbox = dir.path().join("inbox");
    for station in ["nord", "sued"] {
        fs::create_dir_all(inbox.join(station)).unwrap();
    }
    write(&inbox.join("nord"), "fax1.txt", GERMERING_FAX);
    write(&inbox.join("sued"), "fax1.txt", "E - Nr 2020-0305-18\nFF Germering\n");
    let out = dir.path().join("out");

    alarmfax(&dir)
        .args(["batch", "--parser", "ILSFFBGermeringParser", "-o"])
        .arg(&out)
        .arg(format!("{}/**/*.txt", inbox.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files to process"));

    let nord = fs::read_to_string(out.join("nord_fax1.json")).unwrap();
    let sued = fs::read_to_string(out.join("sued_fax1.json")).unwrap();
    assert!(nord.contains("2020-0305-17"));
    assert!(sued.contains("2020-0305-18"));
    assert!(!out.join("fax1.json").exists());
}

#[test]
fn config_init_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings").join("alarmfax.json");

    Command::cargo_bin("alarmfax")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    Command::cargo_bin("alarmfax")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "parser.alias", "IlsErdingParser"])
        .assert()
        .success();

    Command::cargo_bin("alarmfax")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "parser.alias"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"IlsErdingParser\""));
}
