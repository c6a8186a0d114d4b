pub mod error;
pub mod paths;
pub mod reader;
pub mod writer;

pub use error::IoError;
pub use paths::{BITBUCKET_PIPELINES_FILE_NAME, GITLAB_CI_FILE_NAME, ResolvedPaths, resolve_paths};
