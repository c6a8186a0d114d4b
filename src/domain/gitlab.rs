use serde_json::{Map, Value};

use crate::domain::error::TranslateError;

/// Top-level keys that configure the whole pipeline rather than declare a job.
pub const RESERVED_KEYWORDS: [&str; 8] = [
    "image",
    "services",
    "stages",
    "types",
    "before_script",
    "after_script",
    "variables",
    "cache",
];

pub fn is_reserved_keyword(key: &str) -> bool {
    RESERVED_KEYWORDS.contains(&key)
}

/// GitLab marks templates and disabled jobs with a leading dot.
pub fn is_hidden_job(key: &str) -> bool {
    key.starts_with('.')
}

/// Parsed `.gitlab-ci.yml`; top-level keys keep source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    root: Map<String, Value>,
}

impl SourceDocument {
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn image(&self) -> Option<&Value> {
        self.root.get("image")
    }

    /// Job entries in document order.
    pub fn jobs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root
            .iter()
            .filter(|(key, _)| !is_reserved_keyword(key))
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Global cache paths in source order.
    ///
    /// Accepts both the single-cache mapping form and the list-of-caches form.
    pub fn cache_paths(&self) -> Result<Vec<String>, TranslateError> {
        match self.root.get("cache") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Object(cache)) => paths_of(cache),
            Some(Value::Array(caches)) => {
                let mut paths = Vec::new();
                for cache in caches {
                    let Value::Object(cache) = cache else {
                        return Err(malformed_cache("cache list entries must be mappings"));
                    };
                    paths.extend(paths_of(cache)?);
                }
                Ok(paths)
            }
            Some(_) => Err(malformed_cache("`cache` must be a mapping or a list")),
        }
    }
}

fn paths_of(cache: &Map<String, Value>) -> Result<Vec<String>, TranslateError> {
    match cache.get("paths") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(path) => Ok(path.clone()),
                other => Err(malformed_cache(&format!(
                    "cache paths must be strings, found {}",
                    kind_of(other)
                ))),
            })
            .collect(),
        Some(other) => Err(malformed_cache(&format!(
            "`cache.paths` must be a list, found {}",
            kind_of(other)
        ))),
    }
}

fn malformed_cache(reason: &str) -> TranslateError {
    TranslateError::MalformedCache {
        reason: reason.to_string(),
    }
}

/// A GitLab job reduced to the keywords the exporter understands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    pub name: String,
    pub image: Option<Value>,
    pub script: Vec<String>,
    pub before_script: Vec<String>,
    pub after_script: Vec<String>,
    /// Branch filter; `Some` marks the job as branch-restricted.
    pub only: Option<Vec<String>>,
}

impl Job {
    pub fn from_entry(name: &str, value: &Value) -> Result<Self, TranslateError> {
        let Value::Object(fields) = value else {
            return Err(malformed_job(
                name,
                format!("expected a mapping, found {}", kind_of(value)),
            ));
        };

        Ok(Self {
            name: name.to_string(),
            image: fields.get("image").filter(|image| !image.is_null()).cloned(),
            script: script_lines(name, "script", fields.get("script"))?,
            before_script: script_lines(name, "before_script", fields.get("before_script"))?,
            after_script: script_lines(name, "after_script", fields.get("after_script"))?,
            only: fields
                .get("only")
                .map(|only| branch_filter(name, only))
                .transpose()?,
        })
    }

    pub fn is_restricted(&self) -> bool {
        self.only.is_some()
    }
}

fn script_lines(job: &str, key: &str, value: Option<&Value>) -> Result<Vec<String>, TranslateError> {
    let mut lines = Vec::new();
    if let Some(value) = value {
        collect_lines(job, key, value, &mut lines)?;
    }
    Ok(lines)
}

fn collect_lines(
    job: &str,
    key: &str,
    value: &Value,
    lines: &mut Vec<String>,
) -> Result<(), TranslateError> {
    match value {
        Value::Null => Ok(()),
        Value::String(line) => {
            lines.push(line.clone());
            Ok(())
        }
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| collect_lines(job, key, item, lines)),
        other => Err(malformed_job(
            job,
            format!("`{key}` entries must be strings, found {}", kind_of(other)),
        )),
    }
}

fn branch_filter(job: &str, value: &Value) -> Result<Vec<String>, TranslateError> {
    match value {
        Value::String(branch) => Ok(vec![branch.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(branch) => Ok(branch.clone()),
                other => Err(malformed_job(
                    job,
                    format!("`only` entries must be branch names, found {}", kind_of(other)),
                )),
            })
            .collect(),
        Value::Object(filter) => match filter.get("refs") {
            Some(refs @ (Value::String(_) | Value::Array(_))) => branch_filter(job, refs),
            _ => Err(malformed_job(
                job,
                "`only` mapping must list branch names under `refs`".to_string(),
            )),
        },
        other => Err(malformed_job(
            job,
            format!("`only` must list branch names, found {}", kind_of(other)),
        )),
    }
}

fn malformed_job(job: &str, reason: String) -> TranslateError {
    TranslateError::MalformedJob {
        job: job.to_string(),
        reason,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
