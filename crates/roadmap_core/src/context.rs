//! Per-process application context.
//!
//! Owns the config and roadmap repositories for one project directory. Both
//! are created on first use and can be reset, which disposes the current
//! instance so the next access builds a fresh one.

use crate::cache::{RepositoryOptions, RoadmapRepository};
use crate::config::{Config, ConfigRepository, ConfigRepositoryOptions};
use crate::error::{Result, RoadmapError};
use crate::types::Roadmap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Shared state handed to commands.
#[derive(Debug)]
pub struct RoadmapContext {
    project_dir: PathBuf,
    config_options: ConfigRepositoryOptions,
    config_repo: Option<ConfigRepository>,
    roadmap_repo: Option<RoadmapRepository>,
}

impl RoadmapContext {
    /// Context for `project_dir` using the default config search list.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let config_options = ConfigRepositoryOptions::for_project(&project_dir);
        Self::with_config_options(project_dir, config_options)
    }

    /// Context with an explicit config search list.
    pub fn with_config_options(
        project_dir: impl Into<PathBuf>,
        config_options: ConfigRepositoryOptions,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            config_options,
            config_repo: None,
            roadmap_repo: None,
        }
    }

    /// Project directory.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Config repository, created on first use.
    pub fn config_repository(&mut self) -> &mut ConfigRepository {
        self.config_repo
            .get_or_insert_with(|| ConfigRepository::new(self.config_options.clone()))
    }

    /// Effective configuration.
    pub fn config(&mut self) -> Result<Arc<Config>> {
        self.config_repository().load()
    }

    /// Roadmap repository, created on first use.
    ///
    /// Cache settings come from the effective configuration, or defaults
    /// when no config file exists.
    pub fn roadmap_repository(&mut self) -> Result<&mut RoadmapRepository> {
        let repo = match self.roadmap_repo.take() {
            Some(repo) => repo,
            None => {
                let options = match self.config() {
                    Ok(config) => RepositoryOptions::from(&config.cache),
                    Err(RoadmapError::ConfigNotFound { .. }) => RepositoryOptions::default(),
                    Err(e) => return Err(e),
                };
                debug!(?options, "creating roadmap repository");
                RoadmapRepository::new(options)?
            }
        };
        Ok(self.roadmap_repo.insert(repo))
    }

    /// Location of the project's roadmap file.
    pub fn roadmap_path(&mut self) -> Result<PathBuf> {
        let config = self.config()?;
        Ok(config.roadmap_path(&self.project_dir))
    }

    /// Load the project's roadmap.
    pub fn load_roadmap(&mut self) -> Result<Arc<Roadmap>> {
        let path = self.roadmap_path()?;
        self.roadmap_repository()?.load(&path)
    }

    /// Save the project's roadmap.
    pub fn save_roadmap(&mut self, roadmap: &Roadmap) -> Result<()> {
        let path = self.roadmap_path()?;
        self.roadmap_repository()?.save(&path, roadmap)
    }

    /// Dispose the roadmap repository; the next access creates a new one.
    pub fn reset_roadmap_repository(&mut self) {
        if let Some(mut repo) = self.roadmap_repo.take() {
            repo.dispose();
        }
    }

    /// Drop the config repository; the next access creates a new one.
    pub fn reset_config_repository(&mut self) {
        self.config_repo = None;
    }

    /// Release every repository. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.reset_roadmap_repository();
        self.reset_config_repository();
    }
}
