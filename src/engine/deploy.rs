use tracing::{debug, warn};

use crate::domain::bitbucket::Step;
use crate::domain::deployment::{DeploymentChoice, DeploymentClassifier, DeploymentScope};
use crate::domain::error::TranslateError;
use crate::domain::gitlab::Job;
use crate::engine::pipeline::Placement;

/// Ask the classifier where `step` deploys and decide which pipelines get it.
///
/// Restricted jobs get one classified copy of the step per listed branch,
/// duplicates included. Unrestricted jobs are classified once under the
/// `default` label.
pub fn classify_job<C: DeploymentClassifier + ?Sized>(
    job: &Job,
    step: Step,
    classifier: &mut C,
) -> Result<Placement, TranslateError> {
    let Some(branches) = &job.only else {
        let choice = ask(classifier, DeploymentScope::Default { job: &job.name })?;
        return Ok(Placement::Default(with_deployment(step, choice)));
    };

    if branches.is_empty() {
        warn!(job = %job.name, "job has an empty `only` list and is not placed in any pipeline");
    }

    let mut placed = Vec::with_capacity(branches.len());
    for branch in branches {
        let choice = ask(
            classifier,
            DeploymentScope::Branch {
                job: &job.name,
                branch,
            },
        )?;
        placed.push((branch.clone(), with_deployment(step.clone(), choice)));
    }
    Ok(Placement::Branches(placed))
}

fn ask<C: DeploymentClassifier + ?Sized>(
    classifier: &mut C,
    scope: DeploymentScope<'_>,
) -> Result<DeploymentChoice, TranslateError> {
    let choice = classifier
        .classify(&scope)
        .map_err(|source| TranslateError::Classify {
            label: scope.label(),
            source,
        })?;
    debug!(job = scope.job(), label = %scope.label(), deployment = %choice, "classified deployment");
    Ok(choice)
}

fn with_deployment(mut step: Step, choice: DeploymentChoice) -> Step {
    step.deployment = choice.environment();
    step
}
