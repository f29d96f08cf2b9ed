//! E2E CLI tests covering:
//! - `nsight report` rankings in text and JSON
//! - `nsight analyze` slices and reproducibility
//! - `nsight timeline` / `nsight relations` frame order
//! - invalid input handling (abort vs `--skip-invalid`, parse errors, config)
//!
//! Each test runs the `nsight` binary as a subprocess in an isolated temp
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const EDGES: &str = r#"[
  {"source": "A", "target": "B", "weight": 5, "type": "alliance", "time": 2008},
  {"source": "B", "target": "C", "weight": 3, "type": "conflict", "time": 2010},
  {"source": "A", "target": "C", "weight": 10, "type": "alliance", "time": 2012}
]"#;

/// Build a Command targeting the nsight binary, rooted in `dir`.
fn nsight(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nsight"));
    cmd.current_dir(dir);
    cmd.env("NETSIGHT_LOG", "error");
    cmd.env_remove("NETSIGHT_FORMAT");
    cmd.env_remove("RUST_BACKTRACE");
    cmd.env_remove("RUST_LIB_BACKTRACE");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("nsight should not crash");
    assert!(
        output.status.success(),
        "nsight failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

/// First JSON document on `stream`; anything after it (anyhow's `Error:`
/// line, a backtrace) is ignored.
fn first_json(stream: &str) -> Value {
    let start = stream.find('{').expect("json document on stream");
    serde_json::Deserializer::from_str(&stream[start..])
        .into_iter::<Value>()
        .next()
        .expect("one json value")
        .expect("valid json")
}

// ---------------------------------------------------------------------------
// report
// ---------------------------------------------------------------------------

#[test]
fn report_json_ranks_broker_first() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    let json = json_output(nsight(dir.path()).arg("report").arg(&edges).arg("--json"));
    assert_eq!(json["stats"]["node_count"], 3);
    assert_eq!(json["stats"]["edge_count"], 3);
    assert_eq!(json["top_betweenness"][0]["node"], "B");
    assert_eq!(json["top_betweenness"][0]["score"], 1.0);
    assert!(
        json["content_hash"]
            .as_str()
            .is_some_and(|h| h.starts_with("blake3:"))
    );
}

#[test]
fn report_text_reads_stdin() {
    let dir = TempDir::new().expect("tempdir");
    nsight(dir.path())
        .args(["report", "-", "--format", "text", "--top", "1"])
        .write_stdin(EDGES)
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes 3"))
        .stdout(predicate::str::contains("betweenness B 1.0000"));
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_is_reproducible_for_a_seed() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    let run = |seed: &str| {
        json_output(
            nsight(dir.path())
                .arg("analyze")
                .arg(&edges)
                .args(["--format", "json", "--seed", seed]),
        )
    };

    let a = run("42");
    let b = run("42");
    assert_eq!(a["layout"], b["layout"]);
    assert_ne!(a["layout"], run("7")["layout"]);

    for node in ["A", "B", "C"] {
        let x = a["layout"][node]["x"].as_f64().expect("x");
        let y = a["layout"][node]["y"].as_f64().expect("y");
        assert!(x.abs() <= 1.0 && y.abs() <= 1.0);
    }
}

#[test]
fn analyze_up_to_slices_graph() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    let json = json_output(
        nsight(dir.path())
            .arg("analyze")
            .arg(&edges)
            .args(["--up-to", "2008", "--json"]),
    );
    assert_eq!(json["stats"]["node_count"], 2);
    assert!(json["centrality"].get("C").is_none());
}

#[test]
fn analyze_unweighted_removes_detour_broker() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    let json = json_output(
        nsight(dir.path())
            .arg("analyze")
            .arg(&edges)
            .args(["--unweighted", "--json"]),
    );
    assert_eq!(json["centrality"]["B"]["betweenness"], 0.0);
}

// ---------------------------------------------------------------------------
// frames
// ---------------------------------------------------------------------------

#[test]
fn timeline_frames_ascend() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    let json = json_output(nsight(dir.path()).arg("timeline").arg(&edges).arg("--json"));
    let times: Vec<i64> = json["frames"]
        .as_array()
        .expect("frames array")
        .iter()
        .filter_map(|f| f["key"]["value"].as_i64())
        .collect();
    assert_eq!(times, vec![2008, 2010, 2012]);
}

#[test]
fn relation_frames_follow_first_appearance() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    let json = json_output(nsight(dir.path()).arg("relations").arg(&edges).arg("--json"));
    let frames = json["frames"].as_array().expect("frames array");
    assert_eq!(frames[0]["key"]["value"], "alliance");
    assert_eq!(frames[1]["key"]["value"], "conflict");
    // A only has alliance edges.
    assert!(frames[0]["result"]["layout"]["A"]["x"].is_number());
    assert!(frames[1]["result"]["layout"].get("A").is_none());
}

#[test]
fn timeline_pretty_lists_brokers() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    nsight(dir.path())
        .arg("timeline")
        .arg(&edges)
        .args(["--format", "pretty", "--top", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Frame 1: up to 2008"))
        .stdout(predicate::str::contains("Brokers"));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

const WITH_SELF_LOOP: &str = r#"[
  {"source": "A", "target": "B", "weight": 5, "type": "alliance"},
  {"source": "C", "target": "C", "weight": 1, "type": "alliance"},
  {"source": "B", "target": "C", "weight": 3, "type": "conflict"}
]"#;

#[test]
fn invalid_row_aborts_with_code() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", WITH_SELF_LOOP);

    let output = nsight(dir.path())
        .arg("report")
        .arg(&edges)
        .arg("--json")
        .output()
        .expect("run");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let json = first_json(&stderr);
    assert_eq!(json["error"]["error_code"], "E1001");
    assert!(
        json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("row 1"))
    );
}

#[test]
fn error_json_survives_backtraces() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", WITH_SELF_LOOP);

    let output = nsight(dir.path())
        .env("RUST_BACKTRACE", "1")
        .arg("analyze")
        .arg(&edges)
        .arg("--json")
        .output()
        .expect("run");
    assert!(!output.status.success());

    let json = first_json(&String::from_utf8_lossy(&output.stderr));
    assert_eq!(json["error"]["error_code"], "E1001");
}

#[test]
fn skip_invalid_reports_rejections() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", WITH_SELF_LOOP);

    let json = json_output(
        nsight(dir.path())
            .arg("report")
            .arg(&edges)
            .args(["--skip-invalid", "--json"]),
    );
    assert_eq!(json["stats"]["edge_count"], 2);
    assert_eq!(json["rejected"][0]["index"], 1);
    assert_eq!(json["rejected"][0]["reason"]["kind"], "self_loop");
}

#[test]
fn malformed_input_is_a_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", "{ not json");

    nsight(dir.path())
        .arg("analyze")
        .arg(&edges)
        .args(["--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn config_file_is_applied_and_validated() {
    let dir = TempDir::new().expect("tempdir");
    let edges = write_file(dir.path(), "edges.json", EDGES);

    write_file(dir.path(), "netsight.toml", "[centrality]\nweighted = false\n");
    let json = json_output(nsight(dir.path()).arg("analyze").arg(&edges).arg("--json"));
    assert_eq!(json["centrality"]["B"]["betweenness"], 0.0);

    let bad = write_file(dir.path(), "bad.toml", "[layout]\nk = -1.0\n");
    nsight(dir.path())
        .arg("analyze")
        .arg(&edges)
        .arg("--config")
        .arg(&bad)
        .args(["--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("layout.k"));
}
