//! Error types for roadmap_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for roadmap_core operations.
#[derive(Error, Debug)]
pub enum RoadmapError {
    /// Roadmap file does not exist.
    #[error("roadmap not found: {}", path.display())]
    NotFound {
        /// Path that was read
        path: PathBuf,
    },

    /// File exists but is not valid JSON.
    #[error("{} is not valid JSON: {}", path.display(), source)]
    InvalidJson {
        /// Path to the malformed file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// File is valid JSON but does not have the roadmap shape.
    #[error("{} is not a valid roadmap: {}", path.display(), source)]
    InvalidDocument {
        /// Path to the file
        path: PathBuf,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// None of the config search paths exist.
    #[error("config not found (searched: {})", display_paths(searched))]
    ConfigNotFound {
        /// Every path that was tried, in precedence order
        searched: Vec<PathBuf>,
    },

    /// Merged config violates the config schema.
    #[error("invalid config: {}", violations.join("; "))]
    ConfigValidation {
        /// Every violated constraint
        violations: Vec<String>,
    },

    /// The depends-on graph has no valid order.
    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency {
        /// Cycle path, first and last element equal
        cycle: Vec<String>,
    },

    /// No task with the given ID exists in the roadmap.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// Task data rejected by the mutation layer.
    #[error("invalid task: {0}")]
    InvalidTask(String),

    /// All 999 IDs for a type letter are in use.
    #[error("no free task IDs left for prefix {0}")]
    TaskIdExhausted(char),

    /// Cache capacity must be at least one.
    #[error("cache size must be at least 1")]
    InvalidCacheSize,

    /// Embedded schema could not be compiled.
    #[error("schema error: {0}")]
    Schema(String),

    /// Serialization error while writing a document.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RoadmapError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::InvalidJson { .. } => "syntax",
            Self::InvalidDocument { .. } => "structure",
            Self::ConfigNotFound { .. } => "config-not-found",
            Self::ConfigValidation { .. } => "config-validation",
            Self::CircularDependency { .. } => "circular",
            Self::TaskNotFound(_) => "task-not-found",
            Self::InvalidTask(_) => "task",
            Self::TaskIdExhausted(_) => "id-exhausted",
            Self::InvalidCacheSize => "config-validation",
            Self::Schema(_) => "schema",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
        }
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Run 'roadmap init' to create a roadmap."),
            Self::ConfigNotFound { .. } => {
                Some("Run 'roadmap init' to write a .roadmaprc.json in this directory.")
            }
            Self::InvalidJson { .. } => Some("Fix the JSON syntax error and retry."),
            Self::InvalidDocument { .. } => {
                Some("Run 'roadmap validate' to list every problem in the file.")
            }
            Self::CircularDependency { .. } => {
                Some("Remove one of the listed relations, then run 'roadmap validate' again.")
            }
            Self::TaskNotFound(_) => Some("Use 'roadmap list' to see existing task IDs."),
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience Result type for roadmap_core operations.
pub type Result<T> = std::result::Result<T, RoadmapError>;
