//! Core data types for roadmaps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Schema marker written into new roadmap documents.
pub const ROADMAP_SCHEMA: &str = "https://roadmap.dev/schemas/roadmap.schema.json";

/// Kind of work a task represents.
///
/// The variant decides the letter prefix of the task ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    /// Defect fix (`B-`).
    Bug,
    /// New capability (`F-`).
    Feature,
    /// Enhancement of existing behavior (`I-`).
    Improvement,
    /// Planning work (`P-`).
    Planning,
    /// Investigation (`R-`).
    Research,
}

impl TaskType {
    /// All task types in declaration order.
    pub const ALL: [TaskType; 5] = [
        TaskType::Bug,
        TaskType::Feature,
        TaskType::Improvement,
        TaskType::Planning,
        TaskType::Research,
    ];

    /// Letter used as the task ID prefix.
    pub fn prefix(self) -> char {
        match self {
            Self::Bug => 'B',
            Self::Feature => 'F',
            Self::Improvement => 'I',
            Self::Planning => 'P',
            Self::Research => 'R',
        }
    }

    /// Wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Improvement => "improvement",
            Self::Planning => "planning",
            Self::Research => "research",
        }
    }
}

/// Progress state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Work has not begun.
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Work is done.
    Completed,
}

impl TaskStatus {
    /// All statuses in declaration order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

/// Relative importance of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// Do first.
    High,
    /// Default importance.
    Medium,
    /// Do when convenient.
    Low,
}

impl Priority {
    /// All priorities in declaration order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Wire name of the priority.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

macro_rules! wire_enum_traits {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = $ty::ALL.iter().map(|v| v.as_str()).collect();
                        format!(
                            "invalid {} '{}' (expected one of: {})",
                            $what,
                            s,
                            allowed.join(", ")
                        )
                    })
            }
        }
    };
}

wire_enum_traits!(TaskType, "type");
wire_enum_traits!(TaskStatus, "status");
wire_enum_traits!(Priority, "priority");

/// One trackable unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier such as `F-001`.
    pub id: String,
    /// Task type; must agree with the ID prefix.
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Current progress.
    pub status: TaskStatus,
    /// Importance.
    pub priority: Priority,
    /// Short title.
    pub title: String,
    /// Description of the work; never empty.
    pub details: String,
    /// IDs of prerequisite tasks, in declared order.
    #[serde(rename = "depends-on", default)]
    pub depends_on: Vec<String>,
    /// IDs of tasks this one prevents from proceeding, in declared order.
    #[serde(default)]
    pub blocks: Vec<String>,
    /// Free-form labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Additional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Person responsible for the task.
    #[serde(rename = "assignedTo", default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Due date as written by the user.
    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Estimated effort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
    /// Linked GitHub issues or pull requests.
    #[serde(rename = "github-refs", default, skip_serializing_if = "Option::is_none")]
    pub github_refs: Option<Vec<String>>,
    /// Whether the task's tests pass.
    #[serde(rename = "passes-tests", default, skip_serializing_if = "Option::is_none")]
    pub passes_tests: Option<bool>,
    /// Set when the task is created.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set whenever the task is changed.
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,    /// Fields this crate does not know, kept so that a save writes them back.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates a task with required fields set and no relations.
    pub fn new(
        id: impl Into<String>,
        task_type: TaskType,
        title: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            task_type,
            status: TaskStatus::NotStarted,
            priority: Priority::Medium,
            title: title.into(),
            details: details.into(),
            depends_on: Vec::new(),
            blocks: Vec::new(),
            tags: None,
            notes: None,
            assigned_to: None,
            due_date: None,
            effort: None,
            github_refs: None,
            passes_tests: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }
}

/// Descriptive header of a roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapMetadata {
    /// Project name.
    pub name: String,
    /// Project description.
    #[serde(default)]
    pub description: String,
    /// Who created the roadmap.
    #[serde(rename = "createdBy", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// When the roadmap was created.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The full task list document for a project.
///
/// Task order is insertion order and is kept by every read and write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    /// Schema marker.
    #[serde(rename = "$schema", default)]
    pub schema: String,
    /// Header.
    pub metadata: RoadmapMetadata,
    /// Tasks in insertion order.
    #[serde(default)]
    pub tasks: Vec<Task>,    /// Top-level fields this crate does not know.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Category of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationErrorKind {
    /// A relation names a task that does not exist.
    MissingTask,
    /// Relations form a cycle.
    Circular,
    /// A reference is malformed.
    InvalidReference,
    /// Two tasks share an ID.
    DuplicateId,
    /// Document shape is wrong.
    Structure,
    /// A task has a bad or missing field.
    Task,
}

impl ValidationErrorKind {
    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingTask => "missing-task",
            Self::Circular => "circular",
            Self::InvalidReference => "invalid-reference",
            Self::DuplicateId => "duplicate-id",
            Self::Structure => "structure",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found while validating a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Category of the problem.
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    /// Task the problem belongs to, if any.
    #[serde(rename = "taskId", default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Other task IDs involved.
    #[serde(rename = "relatedTaskIds", default, skip_serializing_if = "Option::is_none")]
    pub related_task_ids: Option<Vec<String>>,
}

impl ValidationError {
    /// Creates an error with no task context.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_id: None,
            message: message.into(),
            related_task_ids: None,
        }
    }

    /// Attaches the owning task ID.
    pub fn for_task(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    /// Attaches related task IDs.
    pub fn related(mut self, ids: Vec<String>) -> Self {
        self.related_task_ids = Some(ids);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
