//! Roadmap Core Library
//!
//! Task dependency tracking for project roadmaps stored as JSON, providing:
//! - A dependency graph engine (cycle detection, reference checks, ordering)
//! - Validation of roadmap documents that reports every problem at once
//! - An mtime-checked, LRU-bounded cache in front of roadmap files
//! - Layered configuration merged from project, user and system files
//!
//! # Quick Start
//!
//! ```
//! use roadmap_core::{topological_sort, Task, TaskType};
//!
//! let mut api = Task::new("F-001", TaskType::Feature, "API", "Build the API");
//! let schema = Task::new("F-002", TaskType::Feature, "Schema", "Design tables");
//! api.depends_on.push("F-002".into());
//!
//! let order = topological_sort(&[api, schema]).unwrap();
//! assert_eq!(order[0].id, "F-002");
//! ```
//!
//! # Features
//!
//! ## Cycle Detection
//!
//! `depends-on` and `blocks` edges are searched together:
//!
//! ```
//! use roadmap_core::{detect_circular, Task, TaskType};
//!
//! let mut a = Task::new("F-001", TaskType::Feature, "A", "a");
//! let mut b = Task::new("F-002", TaskType::Feature, "B", "b");
//! a.depends_on.push("F-002".into());
//! b.blocks.push("F-001".into());
//!
//! let cycle = detect_circular(&[a, b]).unwrap();
//! assert_eq!(cycle.first(), cycle.last());
//! ```
//!
//! ## Cached Loading
//!
//! ```
//! use roadmap_core::{Roadmap, RoadmapRepository, RepositoryOptions};
//! use std::sync::Arc;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = tmp.path().join("roadmap.json");
//! let mut repo = RoadmapRepository::new(RepositoryOptions::default()).unwrap();
//!
//! repo.save(&path, &Roadmap::new("demo", "", None, chrono::Utc::now())).unwrap();
//! let first = repo.load(&path).unwrap();
//! let second = repo.load(&path).unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

mod cache;
mod config;
mod context;
mod error;
mod graph;
mod json_io;
mod tasks;
mod types;
mod validate;
mod watch;

pub use cache::{CacheStats, RepositoryOptions, RoadmapRepository};
pub use config::{
    default_search_paths, merge_configs, validate_config, CacheSettings, Config, ConfigMetadata,
    ConfigRepository, ConfigRepositoryOptions, CONFIG_SCHEMA, PROJECT_CONFIG_FILE,
};
pub use context::RoadmapContext;
pub use error::{Result, RoadmapError};
pub use graph::{
    build_graph, detect_circular, get_blocked_tasks, get_depends_on_tasks, topological_sort,
    validate_dependencies, DependencyGraph,
};
pub use tasks::{add_task, find_task, next_task_id, update_task, NewTask, TaskUpdate};
pub use types::*;
pub use validate::{
    is_valid_task_id, validate_document, validate_roadmap_file, validate_value, ValidationReport,
};
pub use watch::{FileWatcher, WatchEvent, WatchEventKind};
