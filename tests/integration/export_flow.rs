use std::fs;

use gl2bb::adapters::answers::AnswerFile;
use gl2bb::cmd::export::{ExportCommandArgs, run};
use gl2bb::domain::deployment::{ClassifyError, DeploymentChoice, DeploymentClassifier, DeploymentScope};
use gl2bb::domain::error::{ExportError, TranslateError};
use gl2bb::io::{BITBUCKET_PIPELINES_FILE_NAME, GITLAB_CI_FILE_NAME};
use serde_json::{Value, json};
use tempfile::tempdir;

struct Fixed(DeploymentChoice);

impl DeploymentClassifier for Fixed {
    fn classify(&mut self, _scope: &DeploymentScope<'_>) -> Result<DeploymentChoice, ClassifyError> {
        Ok(self.0)
    }
}

struct Refusing;

impl DeploymentClassifier for Refusing {
    fn classify(&mut self, _scope: &DeploymentScope<'_>) -> Result<DeploymentChoice, ClassifyError> {
        Err(ClassifyError::Aborted)
    }
}

const GITLAB_CI: &str = r#"
image: maven:3.9
cache:
  paths:
    - ~/.m2/repository/
    - target/
test:
  script:
    - mvn test
deploy:
  before_script: [echo "préparation"]
  script: [mvn deploy]
  only: [main]
"#;

#[test]
fn exports_next_to_source_directory() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(GITLAB_CI_FILE_NAME), GITLAB_CI).expect("write source");

    let args = ExportCommandArgs {
        source: dir.path().to_path_buf(),
        ..ExportCommandArgs::default()
    };
    let outcome = run(&args, &mut Fixed(DeploymentChoice::Staging)).expect("export");

    let destination = dir.path().join(BITBUCKET_PIPELINES_FILE_NAME);
    assert_eq!(outcome.destination, destination);

    let written = fs::read_to_string(&destination).expect("read destination");
    assert!(written.contains("préparation"), "{written}");
    let top_keys: Vec<&str> = written
        .lines()
        .filter(|line| !line.starts_with(' ') && !line.starts_with('-'))
        .filter_map(|line| line.split(':').next())
        .collect();
    assert_eq!(top_keys, ["image", "definitions", "pipelines"]);

    let parsed: Value = serde_yaml::from_str(&written).expect("parse destination");
    assert_eq!(
        parsed,
        json!({
            "image": "maven:3.9",
            "definitions": {"caches": {"target": "target"}},
            "pipelines": {
                "default": [
                    {"step": {
                        "name": "test",
                        "script": ["mvn test"],
                        "caches": ["maven", "target"],
                        "deployment": "staging"
                    }}
                ],
                "branches": {
                    "main": [
                        {"step": {
                            "name": "deploy",
                            "script": ["echo \"préparation\"", "mvn deploy"],
                            "caches": ["maven", "target"],
                            "deployment": "staging"
                        }}
                    ]
                }
            }
        })
    );
}

#[test]
fn explicit_destination_file_is_used() {
    let source_dir = tempdir().expect("tempdir");
    let out_dir = tempdir().expect("tempdir");
    let source = source_dir.path().join("ci.yml");
    fs::write(&source, "build:\n  script: [make]\n").expect("write source");
    let destination = out_dir.path().join("pipelines.yml");

    let args = ExportCommandArgs {
        source,
        destination: Some(destination.clone()),
        ..ExportCommandArgs::default()
    };
    run(&args, &mut Fixed(DeploymentChoice::None)).expect("export");

    assert!(destination.is_file());
    assert!(!source_dir.path().join(BITBUCKET_PIPELINES_FILE_NAME).exists());
}

#[test]
fn answers_file_drives_classification() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(GITLAB_CI_FILE_NAME), GITLAB_CI).expect("write source");
    let mut answers: AnswerFile = toml::from_str(
        r#"
default = "test"
[branches]
main = "production"
"#,
    )
    .expect("answers");

    let args = ExportCommandArgs {
        source: dir.path().to_path_buf(),
        ..ExportCommandArgs::default()
    };
    let outcome = run(&args, &mut answers).expect("export");
    let value = serde_json::to_value(&outcome.document).expect("serialize");

    assert_eq!(
        value["pipelines"]["default"][0]["step"]["deployment"],
        json!("test")
    );
    assert_eq!(
        value["pipelines"]["branches"]["main"][0]["step"]["deployment"],
        json!("production")
    );
}

#[test]
fn empty_source_leaves_destination_untouched() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(GITLAB_CI_FILE_NAME), "").expect("write source");
    let destination = dir.path().join(BITBUCKET_PIPELINES_FILE_NAME);
    fs::write(&destination, "keep: me\n").expect("seed destination");

    let args = ExportCommandArgs {
        source: dir.path().to_path_buf(),
        ..ExportCommandArgs::default()
    };
    let err = run(&args, &mut Fixed(DeploymentChoice::None)).expect_err("empty source");

    assert!(matches!(err, ExportError::EmptyDocument { .. }));
    assert_eq!(fs::read_to_string(&destination).expect("read"), "keep: me\n");
}

#[test]
fn aborted_prompt_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(GITLAB_CI_FILE_NAME), GITLAB_CI).expect("write source");

    let args = ExportCommandArgs {
        source: dir.path().to_path_buf(),
        ..ExportCommandArgs::default()
    };
    let err = run(&args, &mut Refusing).expect_err("aborted");

    assert!(matches!(
        err,
        ExportError::Translate(TranslateError::Classify {
            source: ClassifyError::Aborted,
            ..
        })
    ));
    assert!(!dir.path().join(BITBUCKET_PIPELINES_FILE_NAME).exists());
}

#[test]
fn missing_source_directory_file_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let args = ExportCommandArgs {
        source: dir.path().to_path_buf(),
        ..ExportCommandArgs::default()
    };
    let err = run(&args, &mut Fixed(DeploymentChoice::None)).expect_err("no source file");
    assert!(matches!(err, ExportError::NotFound { .. }));
}
