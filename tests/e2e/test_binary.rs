//! Integration tests for the pachyderm-dag binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("pachyderm-dag").unwrap();
    cmd.env("RUST_LOG", "error");
    cmd
}

fn write(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_dag_viewer_from_input_file() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "dag.json",
        r#"[{"id":"images","parentIds":[]},{"id":"edges","parentIds":["images"]}]"#,
    );

    bin()
        .args(["dag-viewer", "--input", &input, "--static"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"))
        .stdout(predicate::str::contains(">images</text>"))
        .stdout(predicate::str::contains("<linearGradient"))
        .stdout(predicate::str::contains("<script>").not());
}

#[test]
fn test_dag_viewer_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "dag.json", r#"[{"id":"solo","parentIds":[]}]"#);
    let out = dir.path().join("dag.svg");

    bin()
        .args(["dag-viewer", "--input", &input, "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let svg = fs::read_to_string(&out).unwrap();
    assert_eq!(svg.matches("<circle").count(), 1);
    assert!(svg.contains("<script>"));
}

#[test]
fn test_dag_viewer_from_listings() {
    let dir = TempDir::new().unwrap();
    let pipelines = write(
        &dir,
        "pipelines.json",
        r#"{"pipeline":{"name":"edges"},"input":{"pfs":{"repo":"images","glob":"/*"}}}"#,
    );
    let repos = write(
        &dir,
        "repos.json",
        r#"[{"repo":{"name":"images"}},{"repo":{"name":"edges"}}]"#,
    );

    bin()
        .args(["dag-viewer", "--pipelines", &pipelines, "--repos", &repos])
        .assert()
        .success()
        .stdout(predicate::str::contains("url(#grad-images-edges)"));
}

#[test]
fn test_dag_viewer_unreachable_server_still_writes_svg() {
    bin()
        .args(["dag-viewer", "--base-url", "http://127.0.0.1:9/pachyderm/"])
        .env("RUST_LOG", "error")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"))
        .stdout(predicate::str::contains("<circle").not())
        .stderr(predicate::str::contains("server extension appears to be missing"));
}

#[test]
fn test_dag_viewer_bad_graph_is_logged() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "dag.json", r#"[{"id":"A","parentIds":["Z"]}]"#);

    bin()
        .args(["dag-viewer", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("<circle").not())
        .stderr(predicate::str::contains("not a valid DAG"));
}

#[test]
fn test_dag_viewer_missing_input_file() {
    bin()
        .args(["dag-viewer", "--input", "/nonexistent/dag.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: cannot read"));
}

#[test]
fn test_shell_unknown_session() {
    bin()
        .args(["shell", "--name", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no terminal session named 'ghost'"));
}

#[test]
fn test_rejects_unknown_origin() {
    bin()
        .args(["dag-viewer", "--origin", "toolbar"])
        .assert()
        .failure();
}
