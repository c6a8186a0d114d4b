use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("yaml parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("json conversion error: {0}")]
    JsonConvert(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}
