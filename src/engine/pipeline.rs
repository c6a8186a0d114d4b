use crate::domain::bitbucket::{Pipelines, Step, StepEntry};

/// Where the steps built for one job go.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Appended to `pipelines.default`.
    Default(Step),
    /// One step per branch, appended to `pipelines.branches.<branch>`.
    Branches(Vec<(String, Step)>),
}

/// Append a job's steps to the pipelines built so far.
///
/// Branch lists are created on first reference, so branch keys keep the
/// order in which jobs first mention them.
pub fn place(mut pipelines: Pipelines, placement: Placement) -> Pipelines {
    match placement {
        Placement::Default(step) => pipelines.default.push(StepEntry::from(step)),
        Placement::Branches(steps) => {
            for (branch, step) in steps {
                pipelines
                    .branches
                    .entry(branch)
                    .or_default()
                    .push(StepEntry::from(step));
            }
        }
    }
    pipelines
}
