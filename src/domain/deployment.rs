use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Answer to "which environment does this step deploy to?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentChoice {
    None,
    Test,
    Staging,
    Production,
}

impl DeploymentChoice {
    /// Choices in the order the prompt presents them.
    pub const ALL: [Self; 4] = [Self::None, Self::Test, Self::Staging, Self::Production];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Human-facing label shown by the interactive prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Test => "Test",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }

    /// Environment to attach to a step; `None` attaches nothing.
    pub fn environment(self) -> Option<DeploymentEnvironment> {
        match self {
            Self::None => None,
            Self::Test => Some(DeploymentEnvironment::Test),
            Self::Staging => Some(DeploymentEnvironment::Staging),
            Self::Production => Some(DeploymentEnvironment::Production),
        }
    }
}

impl fmt::Display for DeploymentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown deployment `{value}`; expected one of none, test, staging, production")]
pub struct ParseDeploymentError {
    pub value: String,
}

impl FromStr for DeploymentChoice {
    type Err = ParseDeploymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "test" => Ok(Self::Test),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(ParseDeploymentError {
                value: s.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for DeploymentChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Deployment environment carried by a Bitbucket step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnvironment {
    Test,
    Staging,
    Production,
}

/// What a classification request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentScope<'a> {
    /// Unrestricted job headed for the default pipeline.
    Default { job: &'a str },
    /// Restricted job placed in one branch pipeline.
    Branch { job: &'a str, branch: &'a str },
}

impl DeploymentScope<'_> {
    pub fn job(&self) -> &str {
        match self {
            Self::Default { job } | Self::Branch { job, .. } => job,
        }
    }

    /// Free-text label handed to the operator.
    pub fn label(&self) -> String {
        match self {
            Self::Default { .. } => "default".to_string(),
            Self::Branch { job, branch } => format!("{job} in branch {branch}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("deployment prompt was aborted before an answer was given")]
    Aborted,
    #[error("deployment prompt failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability that decides the deployment environment of a step.
///
/// Called once per (job, branch) pair for restricted jobs and once per
/// unrestricted job. Implementations may block.
pub trait DeploymentClassifier {
    fn classify(&mut self, scope: &DeploymentScope<'_>) -> Result<DeploymentChoice, ClassifyError>;
}

impl<C: DeploymentClassifier + ?Sized> DeploymentClassifier for &mut C {
    fn classify(&mut self, scope: &DeploymentScope<'_>) -> Result<DeploymentChoice, ClassifyError> {
        (**self).classify(scope)
    }
}

impl<C: DeploymentClassifier + ?Sized> DeploymentClassifier for Box<C> {
    fn classify(&mut self, scope: &DeploymentScope<'_>) -> Result<DeploymentChoice, ClassifyError> {
        (**self).classify(scope)
    }
}
