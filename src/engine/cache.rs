use indexmap::IndexMap;
use tracing::debug;

use crate::domain::bitbucket::Definitions;
use crate::domain::error::TranslateError;

/// Directories Bitbucket caches out of the box, keyed by path.
///
/// Lookup scans from the end, so a later entry overrides an earlier one for
/// the same path: `~/.ivy2/cache` resolves to `sbt`.
const PREDEFINED_CACHES: &[(&str, &str)] = &[
    ("~/.composer/cache", "composer"),
    ("~/.nuget/packages", "dotnetcore"),
    ("~/.gradle/caches", "gradle"),
    ("~/.ivy2/cache", "ivy2"),
    ("~/.m2/repository", "maven"),
    ("node_modules", "node"),
    ("~/.cache/pip", "pip"),
    ("~/.sbt", "sbt"),
    ("~/.ivy2/cache", "sbt"),
];

/// Caches every step uses, plus the custom definitions they require.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCaches {
    /// Cache names in first-seen order, without duplicates.
    pub names: Vec<String>,
    /// Custom cache key to stripped path.
    pub custom: IndexMap<String, String>,
}

impl ResolvedCaches {
    /// `definitions` block for the destination, if any custom cache exists.
    pub fn definitions(&self) -> Option<Definitions> {
        if self.custom.is_empty() {
            return None;
        }
        Some(Definitions {
            caches: self.custom.clone(),
        })
    }

    fn push_name(&mut self, name: &str) {
        if !self.names.iter().any(|known| known == name) {
            self.names.push(name.to_string());
        }
    }
}

pub fn predefined_cache_name(stripped_path: &str) -> Option<&'static str> {
    PREDEFINED_CACHES
        .iter()
        .rev()
        .find(|(path, _)| *path == stripped_path)
        .map(|(_, name)| *name)
}

fn is_predefined_cache_name(key: &str) -> bool {
    PREDEFINED_CACHES.iter().any(|(_, name)| *name == key)
}

/// Path with trailing slashes removed.
pub fn stripped_path(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Path with every non-alphanumeric character dropped.
pub fn cache_key(path: &str) -> String {
    path.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Fold the global cache paths into predefined names and custom definitions.
pub fn resolve_caches(paths: &[String]) -> Result<ResolvedCaches, TranslateError> {
    paths
        .iter()
        .try_fold(ResolvedCaches::default(), |mut resolved, path| {
            let stripped = stripped_path(path);
            if let Some(name) = predefined_cache_name(stripped) {
                debug!(path = %path, cache = name, "using predefined cache");
                resolved.push_name(name);
                return Ok(resolved);
            }

            let key = cache_key(path);
            if key.is_empty() {
                return Err(TranslateError::InvalidCachePath { path: path.clone() });
            }
            if is_predefined_cache_name(&key) {
                return Err(TranslateError::PredefinedCacheKey {
                    key,
                    path: stripped.to_string(),
                });
            }
            match resolved.custom.get(&key) {
                Some(existing) if existing != stripped => {
                    return Err(TranslateError::CacheKeyCollision {
                        key,
                        first: existing.clone(),
                        second: stripped.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    debug!(path = %path, cache = %key, "registering custom cache");
                    resolved.custom.insert(key.clone(), stripped.to_string());
                }
            }
            resolved.push_name(&key);
            Ok(resolved)
        })
}
