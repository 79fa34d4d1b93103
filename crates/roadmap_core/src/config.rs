//! Configuration types and the config repository.
//!
//! The effective configuration is merged from every existing file in a
//! search list (project, then user, then system). Earlier files win; the
//! `cache` and `metadata` objects merge key by key.

use crate::error::{Result, RoadmapError};
use crate::json_io;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = ".roadmaprc.json";

/// Schema marker written into new config files.
pub const CONFIG_SCHEMA: &str = "https://roadmap.dev/schemas/config.schema.json";

const CONFIG_SCHEMA_DOCUMENT: &str = include_str!("../schemas/config.schema.json");

/// Keys whose object values merge key by key instead of being replaced.
const MERGED_OBJECTS: [&str; 2] = ["cache", "metadata"];

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Schema marker.
    #[serde(rename = "$schema", default)]
    pub schema: String,

    /// Roadmap file location, relative to the project directory or absolute.
    pub path: String,

    /// Project description.
    #[serde(default)]
    pub metadata: ConfigMetadata,

    /// Roadmap cache settings.
    #[serde(default)]
    pub cache: CacheSettings,
}

impl Config {
    /// Creates a config pointing at `path` with default cache settings.
    pub fn new(path: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            schema: CONFIG_SCHEMA.to_string(),
            path: path.into(),
            metadata: ConfigMetadata {
                name: name.into(),
                description: description.into(),
            },
            cache: CacheSettings::default(),
        }
    }

    /// Roadmap path resolved against `project_dir` when relative.
    pub fn roadmap_path(&self, project_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        json_io::write_pretty(path, self)
    }
}

/// Project name and description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMetadata {
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
}

/// Roadmap cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache parsed roadmaps (default: true).
    pub enabled: bool,

    /// Maximum number of cached roadmaps (default: 10).
    #[serde(rename = "maxSize")]
    pub max_size: usize,

    /// Invalidate on external file changes (default: true).
    #[serde(rename = "watchFiles")]
    pub watch_files: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: 10,
            watch_files: true,
        }
    }
}

/// Conventional search list for a project, highest precedence first.
///
/// The system-level path is left out on Windows.
pub fn default_search_paths(project_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![project_dir.join(PROJECT_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("roadmap").join("config.json"));
    }
    if !cfg!(windows) {
        paths.push(PathBuf::from("/etc/roadmap/config.json"));
    }
    paths
}

/// Merge raw config documents given highest precedence first.
///
/// Starts from the last document and applies each earlier one over it.
/// Top-level keys are replaced; `cache` and `metadata` objects only have
/// their explicitly present keys replaced.
pub fn merge_configs(sources: &[Value]) -> Value {
    let mut merged = Map::new();

    for source in sources.iter().rev() {
        let Some(fields) = source.as_object() else {
            continue;
        };
        for (key, value) in fields {
            if MERGED_OBJECTS.contains(&key.as_str()) {
                if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                    (merged.get_mut(key), value)
                {
                    for (k, v) in incoming {
                        existing.insert(k.clone(), v.clone());
                    }
                    continue;
                }
            }
            merged.insert(key.clone(), value.clone());
        }
    }

    Value::Object(merged)
}

/// Check a merged config document against the config schema.
///
/// Returns every violated constraint; empty means valid.
pub fn validate_config(document: &Value) -> Result<Vec<String>> {
    let schema: Value = serde_json::from_str(CONFIG_SCHEMA_DOCUMENT)
        .map_err(|e| RoadmapError::Schema(e.to_string()))?;
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| RoadmapError::Schema(e.to_string()))?;

    Ok(validator
        .iter_errors(document)
        .map(|err| {
            let location = err.instance_path.to_string();
            if location.is_empty() {
                err.to_string()
            } else {
                format!("{}: {}", location, err)
            }
        })
        .collect())
}

/// Options for a [`ConfigRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRepositoryOptions {
    /// Candidate files, highest precedence first.
    pub search_paths: Vec<PathBuf>,
    /// Keep the merged result between loads (default: true).
    pub cache_enabled: bool,
}

impl ConfigRepositoryOptions {
    /// Default search list for `project_dir` with caching on.
    pub fn for_project(project_dir: &Path) -> Self {
        Self {
            search_paths: default_search_paths(project_dir),
            cache_enabled: true,
        }
    }
}

#[derive(Debug)]
struct CachedConfig {
    config: Arc<Config>,
    source: PathBuf,
    modified: SystemTime,
}

/// Resolves and caches the effective configuration.
///
/// Caches a single merged result, keyed on the highest-precedence source
/// file's modification time.
#[derive(Debug)]
pub struct ConfigRepository {
    options: ConfigRepositoryOptions,
    cached: Option<CachedConfig>,
}

impl ConfigRepository {
    /// Creates a repository.
    pub fn new(options: ConfigRepositoryOptions) -> Self {
        Self {
            options,
            cached: None,
        }
    }

    /// Candidate files, highest precedence first.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.options.search_paths
    }

    /// Resolve the effective configuration.
    ///
    /// # Errors
    ///
    /// - [`RoadmapError::ConfigNotFound`] if no candidate file exists
    /// - [`RoadmapError::InvalidJson`] if an existing file is malformed
    /// - [`RoadmapError::ConfigValidation`] listing every schema violation
    pub fn load(&mut self) -> Result<Arc<Config>> {
        if let Some(cached) = &self.cached {
            match json_io::modified_time(&cached.source) {
                Ok(modified) if modified == cached.modified => {
                    debug!(source = %cached.source.display(), "config cache hit");
                    return Ok(Arc::clone(&cached.config));
                }
                _ => debug!(source = %cached.source.display(), "cached config is stale"),
            }
            self.cached = None;
        }

        let mut sources = Vec::new();
        let mut found = Vec::new();
        let mut primary_modified = None;
        for path in &self.options.search_paths {
            match json_io::read_stamped(path, json_io::read_value) {
                Ok((value, modified)) => {
                    primary_modified.get_or_insert(modified);
                    sources.push(value);
                    found.push(path.clone());
                }
                Err(RoadmapError::NotFound { .. }) => {
                    debug!(path = %path.display(), "config source absent");
                }
                Err(e) => return Err(e),
            }
        }

        let Some(primary) = found.first().cloned() else {
            return Err(RoadmapError::ConfigNotFound {
                searched: self.options.search_paths.clone(),
            });
        };

        let shape_errors: Vec<String> = found
            .iter()
            .zip(&sources)
            .filter(|(_, value)| !value.is_object())
            .map(|(path, _)| format!("{}: config must be a JSON object", path.display()))
            .collect();
        if !shape_errors.is_empty() {
            return Err(RoadmapError::ConfigValidation {
                violations: shape_errors,
            });
        }

        let merged = merge_configs(&sources);
        let violations = validate_config(&merged)?;
        if !violations.is_empty() {
            return Err(RoadmapError::ConfigValidation { violations });
        }
        let config: Config = serde_json::from_value(merged)
            .map_err(|e| RoadmapError::ConfigValidation {
                violations: vec![e.to_string()],
            })?;
        let config = Arc::new(config);

        info!(
            sources = found.len(),
            primary = %primary.display(),
            "configuration resolved"
        );

        if let (true, Some(modified)) = (self.options.cache_enabled, primary_modified) {
            self.cached = Some(CachedConfig {
                config: Arc::clone(&config),
                source: primary,
                modified,
            });
        }
        Ok(config)
    }

    /// Drop the cached result and resolve again.
    pub fn reload(&mut self) -> Result<Arc<Config>> {
        self.invalidate_cache();
        self.load()
    }

    /// Drop the cached result.
    pub fn invalidate_cache(&mut self) {
        self.cached = None;
    }

    /// Cached result, if any, without checking freshness.
    pub fn cached_config(&self) -> Option<Arc<Config>> {
        self.cached.as_ref().map(|c| Arc::clone(&c.config))
    }
}
