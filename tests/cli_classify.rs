//! Integration tests for `readably classify` and `readably probe`.
//!
//! Both commands run against the fixtures in `tests/fixtures/`, so no
//! network or browser is needed.

#![allow(deprecated)] // cargo_bin is deprecated; its replacement is not yet stable

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const ARTICLE: &str = "tests/fixtures/article.html";
const LAYOUT: &str = "tests/fixtures/layout.json";
const EMPTY_CONFIG: &str = "tests/fixtures/empty.toml";
const CLEAR_CONFIG: &str = "tests/fixtures/clear.toml";

/// Helper: `readably` with an empty config so the user's file is ignored.
fn readably() -> Command {
    let mut cmd = Command::cargo_bin("readably").expect("binary 'readably' should be built");
    cmd.args(["--config", EMPTY_CONFIG]);
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ─── Classify ────────────────────────────────────────────────────────────────

#[test]
fn classify_text_lists_blocks_in_order() {
    readably()
        .args(["classify", ARTICLE])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 readable blocks"))
        .stdout(predicate::str::contains("address#test"))
        .stdout(predicate::str::contains("p#intro"))
        .stdout(predicate::str::contains("blockquote#quote"))
        .stdout(predicate::str::contains("h1#title").not())
        .stdout(predicate::str::contains("not readable").not());
}

#[test]
fn classify_json_output() {
    let blocks = json_stdout(readably().args(["classify", "--format", "json", ARTICLE]));
    let ids: Vec<&str> = blocks
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["test", "intro", "quote"]);
    assert_eq!(blocks[0]["tag"], "address");
    assert_eq!(blocks[0]["preview"], "John Doe");
    assert_eq!(
        blocks[0]["path"],
        "html > body > div#content-1 > article > header > span > address#test"
    );
}

#[test]
fn classify_reads_stdin() {
    readably()
        .args(["classify", "-"])
        .write_stdin("<div><blockquote>Some text here</blockquote></div>")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 readable blocks"))
        .stdout(predicate::str::contains("html > body > div > blockquote"));
}

#[test]
fn classify_empty_document() {
    readably()
        .args(["classify", "-"])
        .write_stdin("<div></div><section></section>")
        .assert()
        .success()
        .stdout(predicate::str::contains("No readable blocks found"));
}

#[test]
fn classify_exclude_flag_removes_blocks() {
    let blocks = json_stdout(readably().args([
        "classify",
        "--format",
        "json",
        "--exclude",
        "blockquote",
        ARTICLE,
    ]));
    assert_eq!(blocks.as_array().unwrap().len(), 2);
}

#[test]
fn classify_config_file_changes_exclusions() {
    let mut cmd = Command::cargo_bin("readably").unwrap();
    cmd.args(["--config", CLEAR_CONFIG, "classify", "--format", "json", ARTICLE]);
    let blocks = json_stdout(&mut cmd);
    assert_eq!(blocks[0]["id"], "title");
    assert_eq!(blocks.as_array().unwrap().len(), 4);
}

#[test]
fn classify_missing_file_fails() {
    readably()
        .args(["classify", "tests/fixtures/nope.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// ─── Probe ───────────────────────────────────────────────────────────────────

#[test]
fn probe_reports_overlay_position() {
    readably()
        .args(["probe", ARTICLE, "--layout", LAYOUT, "--at", "50,70"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p#intro"))
        .stdout(predicate::str::contains("Top: 260.0px"))
        .stdout(predicate::str::contains("Left: 40.0px"))
        .stdout(predicate::str::contains("First line (line-height): 27.0px"));
}

#[test]
fn probe_json_includes_bounds_and_measurement() {
    let report = json_stdout(readably().args([
        "probe", ARTICLE, "--layout", LAYOUT, "--at", "60,140", "--format", "json",
    ]));
    assert_eq!(report["readable_count"], 3);
    let hovered = &report["hovered"];
    assert_eq!(hovered["block"]["id"], "quote");
    assert_eq!(hovered["top"], 340.0);
    assert_eq!(hovered["left"], 60.0);
    assert_eq!(hovered["height_of_first_line"], 24.0);
    assert_eq!(hovered["measured_first_line_height"], 24.0);
    assert_eq!(hovered["bounds"]["width"], 560.0);
}

#[test]
fn probe_point_on_edge_counts_as_inside() {
    let report = json_stdout(readably().args([
        "probe", ARTICLE, "--layout", LAYOUT, "--at", "40,60", "--format", "json",
    ]));
    assert_eq!(report["hovered"]["block"]["id"], "intro");
}

#[test]
fn probe_outside_every_block() {
    let report = json_stdout(readably().args([
        "probe", ARTICLE, "--layout", LAYOUT, "--at", "5,5", "--format", "json",
    ]));
    assert!(report["hovered"].is_null());

    readably()
        .args(["probe", ARTICLE, "--layout", LAYOUT, "--at", "5,5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No readable block under the pointer"));
}

#[test]
fn probe_rejects_bad_point() {
    readably()
        .args(["probe", ARTICLE, "--layout", LAYOUT, "--at", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected X,Y"));
}

#[test]
fn probe_missing_layout_fails() {
    readably()
        .args(["probe", ARTICLE, "--layout", "tests/fixtures/missing.json", "--at", "1,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load layout"));
}
