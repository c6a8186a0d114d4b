use std::fs;

use predicates::prelude::predicate;
use serde_json::{Value, json};
use tempfile::tempdir;

const GITLAB_CI: &str = r#"
image: node:20
cache:
  paths:
    - node_modules/
test:
  script: [npm test]
deploy:
  script: [npm run deploy]
  only: [main, dev]
"#;

fn summary_json(stdout: &[u8]) -> Value {
    let text = String::from_utf8(stdout.to_vec()).expect("stdout utf8");
    let mut lines = text.lines();
    let header = lines.next().expect("confirmation line");
    assert!(
        header.starts_with("The bitbucket pipeline file has been created"),
        "{header}"
    );
    serde_json::from_str(lines.next().expect("summary line")).expect("summary json")
}

fn parse_stderr_json(stderr: &[u8]) -> Value {
    let text = String::from_utf8(stderr.to_vec()).expect("stderr utf8");
    let line = text
        .lines()
        .find(|line| line.trim_start().starts_with('{'))
        .expect("json error line");
    serde_json::from_str(line).expect("stderr json")
}

#[test]
fn interactive_answers_are_read_from_stdin() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(".gitlab-ci.yml"), GITLAB_CI).expect("write source");

    // test -> default, deploy -> main, deploy -> dev
    let output = assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args(["-s", dir.path().to_str().expect("utf8 path")])
        .write_stdin("1\nProduction\n2\n")
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("Select the type of environment for default"));
    assert!(stderr.contains("Select the type of environment for deploy in branch main"));
    assert!(stderr.contains("Select the type of environment for deploy in branch dev"));

    let summary = summary_json(&output.stdout);
    assert!(summary["pipelines"]["default"][0]["step"].get("deployment").is_none());
    assert_eq!(
        summary["pipelines"]["branches"]["main"][0]["step"]["deployment"],
        json!("production")
    );
    assert_eq!(
        summary["pipelines"]["branches"]["dev"][0]["step"]["deployment"],
        json!("test")
    );

    let written = fs::read_to_string(dir.path().join("bitbucket-pipelines.yml"))
        .expect("destination written");
    let parsed: Value = serde_yaml::from_str(&written).expect("destination yaml");
    assert_eq!(parsed, summary);
}

#[test]
fn deployments_file_runs_without_prompting() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("ci.yml");
    fs::write(&source, GITLAB_CI).expect("write source");
    let answers = dir.path().join("deployments.toml");
    fs::write(
        &answers,
        r#"
[jobs.deploy]
main = "production"
dev = "staging"
"#,
    )
    .expect("write answers");
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).expect("create out dir");

    let output = assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args([
            "--source",
            source.to_str().expect("utf8 path"),
            "--destination",
            out_dir.to_str().expect("utf8 path"),
            "--deployments",
            answers.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(0));
    let destination = out_dir.join("bitbucket-pipelines.yml");
    assert!(
        String::from_utf8(output.stdout.clone())
            .expect("stdout utf8")
            .contains(destination.to_str().expect("utf8 path"))
    );
    let summary = summary_json(&output.stdout);
    assert_eq!(summary["image"], json!("node:20"));
    assert_eq!(
        summary["pipelines"]["default"][0]["step"]["caches"],
        json!(["node"])
    );
    assert_eq!(
        summary["pipelines"]["branches"]["dev"][0]["step"]["deployment"],
        json!("staging")
    );
    assert!(destination.is_file());
}

#[test]
fn empty_source_is_a_data_error_and_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(".gitlab-ci.yml"), "\n").expect("write source");

    let output = assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args(["--source", dir.path().to_str().expect("utf8 path")])
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(65));
    assert!(output.stdout.is_empty());
    let payload = parse_stderr_json(&output.stderr);
    assert_eq!(payload["error"], "empty_document");
    assert!(!dir.path().join("bitbucket-pipelines.yml").exists());
}

#[test]
fn malformed_job_is_a_data_error() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(".gitlab-ci.yml"), "build: make\n").expect("write source");

    assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args(["--source", dir.path().to_str().expect("utf8 path")])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("malformed_job"))
        .stderr(predicate::str::contains("build"));
    assert!(!dir.path().join("bitbucket-pipelines.yml").exists());
}

#[test]
fn missing_source_file_is_reported() {
    let dir = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args(["--source", dir.path().to_str().expect("utf8 path")])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("input_error"));
}

#[test]
fn closed_stdin_aborts_without_output_file() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(".gitlab-ci.yml"), GITLAB_CI).expect("write source");

    assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args(["--source", dir.path().to_str().expect("utf8 path")])
        .write_stdin("")
        .assert()
        .code(130)
        .stderr(predicate::str::contains("prompt_aborted"));
    assert!(!dir.path().join("bitbucket-pipelines.yml").exists());
}

#[test]
fn invalid_deployments_file_is_a_configuration_error() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(".gitlab-ci.yml"), GITLAB_CI).expect("write source");
    let answers = dir.path().join("deployments.toml");
    fs::write(&answers, "default = \"qa\"\n").expect("write answers");

    assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args([
            "--source",
            dir.path().to_str().expect("utf8 path"),
            "--deployments",
            answers.to_str().expect("utf8 path"),
        ])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("configuration_error"));
    assert!(!dir.path().join("bitbucket-pipelines.yml").exists());
}

#[test]
fn non_utf8_source_is_a_data_error() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(".gitlab-ci.yml"), b"build:\n  script: [\"\xff\xfe\"]\n")
        .expect("write source");

    assert_cmd::cargo::cargo_bin_cmd!("gl2bb")
        .args(["--source", dir.path().to_str().expect("utf8 path")])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("malformed_document"));
    assert!(!dir.path().join("bitbucket-pipelines.yml").exists());
}
