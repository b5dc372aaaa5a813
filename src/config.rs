//! Run configuration: shipped defaults, `.schisma.toml`, and CLI overrides.
//!
//! Values are read into [`RawConfig`] unvalidated, layered, then resolved into a
//! [`PartitionConfig`]. An unrecognized strategy/mode/policy or a non-positive
//! `max_groups` falls back to the default with a warning instead of failing.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::execute::{FailurePolicy, RunMode};
use crate::partition::Strategy;

/// Config file looked up in the repository root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = ".schisma.toml";

pub const DEFAULT_MAX_GROUPS: usize = 5;

/// Directory names that mark a feature area wherever they appear in a path.
pub const DEFAULT_FEATURE_SEGMENTS: &[&str] = &[
    "core",
    "api",
    "config",
    "security",
    "auth",
    "test",
    "tests",
    "ui",
    "components",
    "docs",
    "db",
    "models",
    "services",
    "utils",
    "scripts",
    "cli",
];

/// Terms searched for (case-insensitively) in diff text.
pub const DEFAULT_DOMAIN_TERMS: &[&str] = &[
    "config",
    "log",
    "security",
    "api",
    "test",
    "ui",
    "error",
    "database",
    "backup",
    "auth",
    "cache",
];

/// Word lists driving the candidate generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabularies {
    pub feature_segments: Vec<String>,
    pub domain_terms: Vec<String>,
}

impl Vocabularies {
    pub fn new<I, S>(feature_segments: I, domain_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            feature_segments: normalize_words(feature_segments),
            domain_terms: normalize_words(domain_terms),
        }
    }
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self::new(
            DEFAULT_FEATURE_SEGMENTS.iter().copied(),
            DEFAULT_DOMAIN_TERMS.iter().copied(),
        )
    }
}

/// Trim, lowercase, drop empties and duplicates (first occurrence wins).
fn normalize_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for word in words {
        let word = word.as_ref().trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

/// Validated configuration for one partitioning run.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionConfig {
    pub mode: RunMode,
    pub max_groups: usize,
    pub strategy: Strategy,
    pub failure_policy: FailurePolicy,
    pub vocabularies: Vocabularies,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            max_groups: DEFAULT_MAX_GROUPS,
            strategy: Strategy::default(),
            failure_policy: FailurePolicy::default(),
            vocabularies: Vocabularies::default(),
        }
    }
}

/// Unvalidated options from a config file or the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub mode: Option<String>,
    #[serde(alias = "maxGroups")]
    pub max_groups: Option<i64>,
    pub strategy: Option<String>,
    #[serde(alias = "onFailure")]
    pub on_failure: Option<String>,
    #[serde(alias = "featureVocabulary")]
    pub feature_vocabulary: Option<Vec<String>>,
    #[serde(alias = "domainTermVocabulary")]
    pub domain_term_vocabulary: Option<Vec<String>>,
}

impl RawConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: RawConfig) -> RawConfig {
        RawConfig {
            mode: overrides.mode.or(self.mode),
            max_groups: overrides.max_groups.or(self.max_groups),
            strategy: overrides.strategy.or(self.strategy),
            on_failure: overrides.on_failure.or(self.on_failure),
            feature_vocabulary: overrides.feature_vocabulary.or(self.feature_vocabulary),
            domain_term_vocabulary: overrides
                .domain_term_vocabulary
                .or(self.domain_term_vocabulary),
        }
    }

    /// Validate into a [`PartitionConfig`], recovering invalid values with defaults.
    pub fn resolve(&self) -> PartitionConfig {
        let defaults = PartitionConfig::default();

        let mode = parse_or_default(self.mode.as_deref(), "mode", defaults.mode);
        let strategy = parse_or_default(self.strategy.as_deref(), "strategy", defaults.strategy);
        let failure_policy =
            parse_or_default(self.on_failure.as_deref(), "on_failure", defaults.failure_policy);

        let max_groups = match self.max_groups {
            None => defaults.max_groups,
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(defaults.max_groups),
            Some(n) => {
                warn!(
                    "Invalid max_groups {} (must be positive), using default {}",
                    n, defaults.max_groups
                );
                defaults.max_groups
            }
        };

        let vocabularies = Vocabularies {
            feature_segments: self
                .feature_vocabulary
                .as_ref()
                .map(normalize_words)
                .unwrap_or(defaults.vocabularies.feature_segments),
            domain_terms: self
                .domain_term_vocabulary
                .as_ref()
                .map(normalize_words)
                .unwrap_or(defaults.vocabularies.domain_terms),
        };

        PartitionConfig {
            mode,
            max_groups,
            strategy,
            failure_policy,
            vocabularies,
        }
    }
}

fn parse_or_default<T>(value: Option<&str>, option: &str, default: T) -> T
where
    T: std::str::FromStr<Err = String> + std::fmt::Display,
{
    match value.map(str::parse::<T>) {
        None => default,
        Some(Ok(parsed)) => parsed,
        Some(Err(e)) => {
            warn!("Invalid {}: {}. Using default '{}'", option, e, default);
            default
        }
    }
}

/// Locate and load the config file.
///
/// An explicit path must be readable. Without one, `.schisma.toml` in `workdir`
/// is used when present; otherwise all options keep their defaults.
pub fn load_config(explicit: Option<&Path>, workdir: Option<&Path>) -> Result<RawConfig, ConfigError> {
    let path: Option<PathBuf> = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => workdir
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|candidate| candidate.is_file()),
    };

    match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            RawConfig::load(&path)
        }
        None => Ok(RawConfig::default()),
    }
}
