use crate::domain::bitbucket::Step;
use crate::domain::gitlab::Job;

/// Build the Bitbucket step for `job`.
///
/// The script is `before_script`, then `script`, then `after_script`; empty
/// fragments contribute nothing. Every step carries the full global cache list.
pub fn build_step(job: &Job, caches: &[String]) -> Step {
    let script = job
        .before_script
        .iter()
        .chain(&job.script)
        .chain(&job.after_script)
        .cloned()
        .collect();

    Step {
        name: job.name.clone(),
        image: job.image.clone(),
        script,
        caches: caches.to_vec(),
        deployment: None,
    }
}
