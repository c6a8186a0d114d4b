use std::path::{Path, PathBuf};

pub const GITLAB_CI_FILE_NAME: &str = ".gitlab-ci.yml";
pub const BITBUCKET_PIPELINES_FILE_NAME: &str = "bitbucket-pipelines.yml";

/// Concrete files an export reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Resolve `--source` / `--destination` into file paths.
///
/// A source directory means its `.gitlab-ci.yml`. Without a destination the
/// output lands next to the source as `bitbucket-pipelines.yml`; a
/// destination that is an existing directory gets that file name inside it.
pub fn resolve_paths(source: &Path, destination: Option<&Path>) -> ResolvedPaths {
    let source_is_dir = source.is_dir();
    let source_file = if source_is_dir {
        source.join(GITLAB_CI_FILE_NAME)
    } else {
        source.to_path_buf()
    };

    let destination = match destination {
        Some(destination) => destination.to_path_buf(),
        None if source_is_dir => source.join(BITBUCKET_PIPELINES_FILE_NAME),
        None => source
            .parent()
            .map(|parent| parent.join(BITBUCKET_PIPELINES_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(BITBUCKET_PIPELINES_FILE_NAME)),
    };
    let destination = if destination.is_dir() {
        destination.join(BITBUCKET_PIPELINES_FILE_NAME)
    } else {
        destination
    };

    ResolvedPaths {
        source: source_file,
        destination,
    }
}
