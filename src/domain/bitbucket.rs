//! Bitbucket Pipelines document model.
//!
//! Field order in these structs is the order keys are written in
//! `bitbucket-pipelines.yml`; step order inside each list is execution order.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::domain::deployment::DeploymentEnvironment;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DestinationDocument {
    /// Global build image, copied verbatim from the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Definitions>,

    pub pipelines: Pipelines,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Definitions {
    /// Custom cache name to directory.
    pub caches: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pipelines {
    /// Steps for jobs without a branch filter.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default: Vec<StepEntry>,

    /// Steps per branch, branches in first-referenced order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub branches: IndexMap<String, Vec<StepEntry>>,
}

/// `- step: {...}` list item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepEntry {
    pub step: Step,
}

impl From<Step> for StepEntry {
    fn from(step: Step) -> Self {
        Self { step }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Step {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub script: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub caches: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentEnvironment>,
}
