use thiserror::Error;

use crate::domain::deployment::ClassifyError;
use crate::io::IoError;

/// Errors produced while translating a parsed GitLab CI document.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A job entry does not have the shape the translator understands.
    #[error("job `{job}` is malformed: {reason}")]
    MalformedJob { job: String, reason: String },

    /// The global `cache` block does not have a recognised shape.
    #[error("global cache is malformed: {reason}")]
    MalformedCache { reason: String },

    /// A cache path strips down to an empty cache key.
    #[error("cache path `{path}` does not contain any alphanumeric characters")]
    InvalidCachePath { path: String },

    /// Two different cache paths strip down to the same cache key.
    #[error("cache paths `{first}` and `{second}` both map to cache key `{key}`")]
    CacheKeyCollision {
        key: String,
        first: String,
        second: String,
    },

    /// A custom cache path strips down to the name of a predefined cache.
    #[error("cache path `{path}` maps to cache key `{key}`, which is a predefined cache name")]
    PredefinedCacheKey { key: String, path: String },

    /// The deployment classifier could not produce an answer.
    #[error("failed to classify deployment for {label}: {source}")]
    Classify {
        label: String,
        #[source]
        source: ClassifyError,
    },
}

/// Errors produced by the `export` command boundary.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Source file does not exist or cannot be read.
    #[error("failed to open source file `{path}`: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Source file holds no structured content at all.
    #[error("source file `{path}` is empty")]
    EmptyDocument { path: String },

    /// Source file is not a YAML mapping.
    #[error("failed to parse source file `{path}`: {reason}")]
    MalformedDocument { path: String, reason: String },

    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Destination file could not be written.
    #[error("failed to write destination file `{path}`: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: IoError,
    },
}
