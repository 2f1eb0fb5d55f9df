//! End-to-end tests of the `surveybook` binary
//!
//! Every test works on its own temporary store, passed with `--store`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{open_workbook, Reader, Xlsx};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn surveybook(store: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_surveybook"))
        .arg("--store")
        .arg(store)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute surveybook")
}

fn response_json(gender: &str, marital: &str, age: &str, q2: i64) -> String {
    serde_json::json!({
        "q1_worried_global_warming": 5,
        "q2_global_warming_threat": q2,
        "q3_british_use_too_much_petrol": 4,
        "q4_look_petrol_substitutes": 6,
        "q5_petrol_prices_too_high": 7,
        "q6_high_prices_impact_cars": 3,
        "personality_novelist": 2,
        "personality_innovator": 6,
        "personality_trendsetter": 4,
        "personality_forerunner": 4,
        "personality_mainstreamer": 3,
        "personality_classic": 1,
        "gender": gender,
        "marital_status": marital,
        "age_category": age,
    })
    .to_string()
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn store(&self) -> PathBuf {
        self.dir.path().join("responses.jsonl")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        surveybook(&self.store(), args)
    }

    fn submit(&self, json: &str) -> Output {
        let file = self.path("submission.json");
        fs::write(&file, json).unwrap();
        self.run(&["submit", file.to_str().unwrap()])
    }

    fn seed(&self) {
        for (gender, marital, age, q2) in [
            ("Male", "Married", "18 to 34", 6),
            ("Female", "Unmarried", "35 to 65", 3),
            ("Female", "Married", "65 and older", 5),
        ] {
            let out = self.submit(&response_json(gender, marital, age, q2));
            assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
        }
    }

    fn listed(&self) -> Vec<serde_json::Value> {
        let out = self.run(&["list", "--format", "json"]);
        assert!(out.status.success());
        serde_json::from_slice(&out.stdout).unwrap()
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

#[test]
fn submit_assigns_increasing_ids() {
    let ws = Workspace::new();
    ws.seed();

    let listed = ws.listed();
    assert_eq!(listed.len(), 3);
    let ids: Vec<u64> = listed.iter().map(|r| r["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn invalid_submission_is_rejected() {
    let ws = Workspace::new();

    let out = ws.submit(&response_json("Male", "Married", "18 to 34", 9));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("must be between 1 and 7"), "{}", stderr(&out));

    let out = ws.submit(&response_json("male", "Married", "18 to 34", 4));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("unknown value 'male'"));

    assert!(ws.listed().is_empty());
}

#[test]
fn patch_changes_only_named_fields() {
    let ws = Workspace::new();
    ws.seed();

    let out = ws.run(&["patch", "2", "--marital-status", "Married"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let second = &ws.listed()[1];
    assert_eq!(second["answers"]["demographics"]["marital_status"], "Married");
    assert_eq!(second["answers"]["demographics"]["gender"], "Female");
}

#[test]
fn patch_without_fields_fails() {
    let ws = Workspace::new();
    ws.seed();

    let out = ws.run(&["patch", "1"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("nothing to patch"));
}

#[test]
fn patch_unknown_id_fails() {
    let ws = Workspace::new();
    ws.seed();

    let out = ws.run(&["patch", "42", "--gender", "Male"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Response 42 not found"));
}

#[test]
fn stats_counts_categories() {
    let ws = Workspace::new();
    ws.seed();

    let out = ws.run(&["stats", "--format", "json"]);
    assert!(out.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["gender"][1]["value"], "Female");
    assert_eq!(stats["gender"][1]["count"], 2);

    let text = stdout(&ws.run(&["stats"]));
    assert!(text.contains("Total responses: 3"));
}

#[test]
fn clear_requires_confirmation() {
    let ws = Workspace::new();
    ws.seed();

    let out = ws.run(&["clear"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(ws.listed().len(), 3);

    let out = ws.run(&["clear", "--yes"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Removed 3 responses"));
    assert!(ws.listed().is_empty());

    // Ids keep counting after a clear
    ws.seed();
    assert_eq!(ws.listed()[0]["id"], 4);
}

#[test]
fn export_of_empty_store_exits_2() {
    let ws = Workspace::new();
    let output = ws.path("out.xlsx");

    let out = ws.run(&["export", "--output", output.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("nothing to export"));
    assert!(!output.exists());
}

#[test]
fn export_writes_eight_sheets() {
    let ws = Workspace::new();
    ws.seed();
    let output = ws.path("reports/survey_export.xlsx");

    let out = ws.run(&["export", "--output", output.to_str().unwrap()]);
    assert!(out.status.success(), "{}", stderr(&out));

    let book: Xlsx<_> = open_workbook(&output).unwrap();
    let names = book.sheet_names();
    assert_eq!(names.len(), 8);
    assert_eq!(names.first().map(String::as_str), Some("Survey Data"));
    assert_eq!(names.last().map(String::as_str), Some("Helper Data"));
}

#[test]
fn export_rejects_invalid_settings() {
    let ws = Workspace::new();
    ws.seed();
    let output = ws.path("out.xlsx");

    let out = ws.run(&[
        "export",
        "--output",
        output.to_str().unwrap(),
        "--alpha",
        "1.5",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("significance_level"));
}

#[test]
fn export_reads_config_file() {
    let ws = Workspace::new();
    ws.seed();
    let config = ws.path("report.toml");
    fs::write(&config, "innovator_threshold = 9\n").unwrap();
    let output = ws.path("out.xlsx");

    let out = ws.run(&[
        "--config",
        config.to_str().unwrap(),
        "export",
        "--output",
        output.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("innovator_threshold"));
}

#[test]
fn export_then_import_round_trips() {
    let source = Workspace::new();
    source.seed();
    let output = source.path("survey_export.xlsx");
    let out = source.run(&["export", "--output", output.to_str().unwrap()]);
    assert!(out.status.success(), "{}", stderr(&out));

    let target = Workspace::new();
    let out = target.run(&["import", output.to_str().unwrap()]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("Imported 3 responses (0 rows skipped)"));

    let before = source.listed();
    let after = target.listed();
    assert_eq!(after.len(), before.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a["answers"], b["answers"]);
    }
}

#[test]
fn check_warns_about_unseen_categories() {
    let ws = Workspace::new();
    let out = ws.submit(&response_json("Male", "Married", "18 to 34", 4));
    assert!(out.status.success());

    let out = ws.run(&["check"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stderr(&out).contains("warning[W001]: Gender value 'Female'"));

    let out = ws.run(&["check", "--strict"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error[W001]"));
}

#[test]
fn check_json_lists_diagnostics() {
    let ws = Workspace::new();
    ws.seed();

    let out = ws.run(&["check", "--format", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["responses"], 3);
    let codes: Vec<&str> = doc["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"I001"));
    assert!(!codes.contains(&"W001"));
}
