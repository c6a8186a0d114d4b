pub mod cache;
pub mod deploy;
pub mod pipeline;
pub mod step;

use tracing::{debug, info, warn};

use crate::domain::bitbucket::{DestinationDocument, Pipelines};
use crate::domain::deployment::DeploymentClassifier;
use crate::domain::error::TranslateError;
use crate::domain::gitlab::{Job, SourceDocument, is_hidden_job};

/// Engine-level switches for a translation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Leave dot-prefixed (hidden) jobs out of the output.
    pub skip_hidden_jobs: bool,
}

/// Translate a GitLab CI document into a Bitbucket Pipelines document.
///
/// Jobs are visited in document order; the classifier is consulted as each
/// job is placed, so prompts follow the same order.
pub fn translate<C: DeploymentClassifier + ?Sized>(
    source: &SourceDocument,
    classifier: &mut C,
    options: TranslateOptions,
) -> Result<DestinationDocument, TranslateError> {
    let caches = cache::resolve_caches(&source.cache_paths()?)?;

    let mut pipelines = Pipelines::default();
    for (name, value) in source.jobs() {
        if options.skip_hidden_jobs && is_hidden_job(name) {
            warn!(job = name, "skipping hidden job");
            continue;
        }
        let job = Job::from_entry(name, value)?;
        let step = step::build_step(&job, &caches.names);
        let placement = deploy::classify_job(&job, step, classifier)?;
        debug!(job = name, restricted = job.is_restricted(), "placed job");
        pipelines = pipeline::place(pipelines, placement);
    }

    info!(
        default_steps = pipelines.default.len(),
        branches = pipelines.branches.len(),
        custom_caches = caches.custom.len(),
        "translated pipeline"
    );
    Ok(DestinationDocument {
        image: source.image().cloned(),
        definitions: caches.definitions(),
        pipelines,
    })
}
