use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::deployment::{
    ClassifyError, DeploymentChoice, DeploymentClassifier, DeploymentScope,
};

#[derive(Debug, Error)]
pub enum AnswersError {
    #[error("failed to read deployments file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse deployments file `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Pre-recorded deployment answers, used instead of prompting.
///
/// ```toml
/// default = "test"
///
/// [branches]
/// main = "production"
///
/// [jobs.deploy]
/// main = "staging"
/// default = "none"
/// ```
///
/// Per-job entries win over per-branch entries, which win over `default`.
/// Anything unanswered is `none`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerFile {
    #[serde(default)]
    pub default: Option<DeploymentChoice>,
    #[serde(default)]
    pub branches: BTreeMap<String, DeploymentChoice>,
    #[serde(default)]
    pub jobs: BTreeMap<String, BTreeMap<String, DeploymentChoice>>,
}

impl AnswerFile {
    pub fn load(path: &Path) -> Result<Self, AnswersError> {
        let text = fs::read_to_string(path).map_err(|source| AnswersError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| AnswersError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn answer(&self, scope: &DeploymentScope<'_>) -> DeploymentChoice {
        let per_job = |key: &str| {
            self.jobs
                .get(scope.job())
                .and_then(|answers| answers.get(key))
                .copied()
        };
        let found = match scope {
            DeploymentScope::Default { .. } => per_job("default").or(self.default),
            DeploymentScope::Branch { branch, .. } => {
                per_job(*branch).or_else(|| self.branches.get(*branch).copied())
            }
        };
        found.unwrap_or(DeploymentChoice::None)
    }
}

impl DeploymentClassifier for AnswerFile {
    fn classify(&mut self, scope: &DeploymentScope<'_>) -> Result<DeploymentChoice, ClassifyError> {
        let choice = self.answer(scope);
        debug!(label = %scope.label(), deployment = %choice, "answered from deployments file");
        Ok(choice)
    }
}
