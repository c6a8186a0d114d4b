use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::bitbucket::DestinationDocument;
use crate::domain::deployment::DeploymentClassifier;
use crate::domain::error::ExportError;
use crate::domain::gitlab::SourceDocument;
use crate::engine::{self, TranslateOptions};
use crate::io::{self, IoError, reader, writer};

/// Input arguments for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportCommandArgs {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub options: TranslateOptions,
}

/// What an export produced and where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub destination: PathBuf,
    pub document: DestinationDocument,
}

/// Execute `export`: load the GitLab CI file, translate it, write the result.
///
/// The destination is only touched once translation has fully succeeded.
pub fn run<C: DeploymentClassifier + ?Sized>(
    args: &ExportCommandArgs,
    classifier: &mut C,
) -> Result<ExportOutcome, ExportError> {
    let paths = io::resolve_paths(&args.source, args.destination.as_deref());
    debug!(
        source = %paths.source.display(),
        destination = %paths.destination.display(),
        "resolved export paths"
    );

    let source = load_source(&paths.source)?;
    let document = engine::translate(&source, classifier, args.options)?;

    writer::write_yaml_file(&paths.destination, &document).map_err(|source| {
        ExportError::WriteOutput {
            path: paths.destination.display().to_string(),
            source,
        }
    })?;
    info!(destination = %paths.destination.display(), "wrote bitbucket pipeline");

    Ok(ExportOutcome {
        destination: paths.destination,
        document,
    })
}

/// Read and parse the GitLab CI file at `path`.
pub fn load_source(path: &Path) -> Result<SourceDocument, ExportError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| ExportError::NotFound {
        path: display.clone(),
        source,
    })?;

    let value = match reader::read_yaml_document(file) {
        Ok(Some(value)) => value,
        Ok(None) => return Err(ExportError::EmptyDocument { path: display }),
        Err(IoError::Io(source)) if source.kind() != ErrorKind::InvalidData => {
            return Err(ExportError::NotFound {
                path: display,
                source,
            });
        }
        Err(error) => {
            return Err(ExportError::MalformedDocument {
                path: display,
                reason: error.to_string(),
            });
        }
    };

    match value {
        Value::Object(root) => Ok(SourceDocument::new(root)),
        _ => Err(ExportError::MalformedDocument {
            path: display,
            reason: "top level must be a mapping of keywords and jobs".to_string(),
        }),
    }
}
