//! Task creation and update on an in-memory roadmap.
//!
//! These functions change the [`Roadmap`] value only; persisting it is the
//! caller's job (see [`crate::RoadmapRepository::save`]).

use crate::error::{Result, RoadmapError};
use crate::types::{
    Priority, Roadmap, RoadmapMetadata, Task, TaskStatus, TaskType, ROADMAP_SCHEMA,
};
use chrono::{DateTime, Utc};

impl Roadmap {
    /// Creates an empty roadmap.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            schema: ROADMAP_SCHEMA.to_string(),
            metadata: RoadmapMetadata {
                name: name.into(),
                description: description.into(),
                created_by,
                created_at: Some(now),
            },
            tasks: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Fields for a task about to be created.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Decides the ID prefix.
    pub task_type: TaskType,
    /// Short title.
    pub title: String,
    /// Description; must not be empty.
    pub details: String,
    /// Importance (default: medium).
    pub priority: Priority,
    /// Initial status (default: not-started).
    pub status: TaskStatus,
    /// Prerequisites; each must exist.
    pub depends_on: Vec<String>,
    /// Tasks held up by this one; each must exist.
    pub blocks: Vec<String>,
    /// Labels.
    pub tags: Vec<String>,
    /// Owner.
    pub assigned_to: Option<String>,
}

impl NewTask {
    /// Starts a new task description with defaults for everything optional.
    pub fn new(task_type: TaskType, title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            task_type,
            title: title.into(),
            details: details.into(),
            priority: Priority::Medium,
            status: TaskStatus::NotStarted,
            depends_on: Vec::new(),
            blocks: Vec::new(),
            tags: Vec::new(),
            assigned_to: None,
        }
    }
}

/// Partial change to an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title.
    pub title: Option<String>,
    /// New details; must not be empty.
    pub details: Option<String>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<Priority>,
    /// Replacement prerequisite list.
    pub depends_on: Option<Vec<String>>,
    /// Replacement blocks list.
    pub blocks: Option<Vec<String>>,
    /// Replacement notes.
    pub notes: Option<String>,
    /// New owner.
    pub assigned_to: Option<String>,
    /// New test state.
    pub passes_tests: Option<bool>,
}

/// Look up a task by ID.
pub fn find_task<'a>(roadmap: &'a Roadmap, id: &str) -> Option<&'a Task> {
    roadmap.tasks.iter().find(|t| t.id == id)
}

/// Next unused ID for a task type: highest existing number plus one.
///
/// # Errors
///
/// Returns [`RoadmapError::TaskIdExhausted`] once `999` is taken.
pub fn next_task_id(roadmap: &Roadmap, task_type: TaskType) -> Result<String> {
    let prefix = task_type.prefix();
    let highest = roadmap
        .tasks
        .iter()
        .filter_map(|t| {
            let (letter, number) = t.id.split_once('-')?;
            if letter.len() == 1 && letter.starts_with(prefix) {
                number.parse::<u32>().ok()
            } else {
                None
            }
        })
        .max()
        .unwrap_or(0);

    if highest >= 999 {
        return Err(RoadmapError::TaskIdExhausted(prefix));
    }
    Ok(format!("{}-{:03}", prefix, highest + 1))
}

/// Append a new task with a generated ID and return it.
///
/// # Errors
///
/// Returns [`RoadmapError::InvalidTask`] if `details` is empty or a relation
/// names a task that does not exist.
pub fn add_task(roadmap: &mut Roadmap, new: NewTask, now: DateTime<Utc>) -> Result<&Task> {
    if new.details.trim().is_empty() {
        return Err(RoadmapError::InvalidTask("details must not be empty".into()));
    }
    check_references(roadmap, &new.depends_on, &new.blocks)?;

    let id = next_task_id(roadmap, new.task_type)?;
    let mut task = Task::new(id, new.task_type, new.title, new.details);
    task.priority = new.priority;
    task.status = new.status;
    task.depends_on = new.depends_on;
    task.blocks = new.blocks;
    task.tags = (!new.tags.is_empty()).then_some(new.tags);
    task.assigned_to = new.assigned_to;
    task.created_at = Some(now);
    task.updated_at = Some(now);

    roadmap.tasks.push(task);
    tracing::debug!(id = %roadmap.tasks[roadmap.tasks.len() - 1].id, "task added");
    Ok(&roadmap.tasks[roadmap.tasks.len() - 1])
}

/// Apply `update` to the task with the given ID and stamp `updatedAt`.
///
/// # Errors
///
/// Returns [`RoadmapError::TaskNotFound`] for an unknown ID and
/// [`RoadmapError::InvalidTask`] for empty details or unknown relation targets.
pub fn update_task<'a>(
    roadmap: &'a mut Roadmap,
    id: &str,
    update: TaskUpdate,
    now: DateTime<Utc>,
) -> Result<&'a Task> {
    let index = roadmap
        .tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| RoadmapError::TaskNotFound(id.to_string()))?;

    if update.details.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err(RoadmapError::InvalidTask("details must not be empty".into()));
    }
    check_references(
        roadmap,
        update.depends_on.as_deref().unwrap_or(&[]),
        update.blocks.as_deref().unwrap_or(&[]),
    )?;

    let task = &mut roadmap.tasks[index];
    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(details) = update.details {
        task.details = details;
    }
    if let Some(status) = update.status {
        task.status = status;
    }
    if let Some(priority) = update.priority {
        task.priority = priority;
    }
    if let Some(depends_on) = update.depends_on {
        task.depends_on = depends_on;
    }
    if let Some(blocks) = update.blocks {
        task.blocks = blocks;
    }
    if let Some(notes) = update.notes {
        task.notes = Some(notes);
    }
    if let Some(assigned_to) = update.assigned_to {
        task.assigned_to = Some(assigned_to);
    }
    if let Some(passes) = update.passes_tests {
        task.passes_tests = Some(passes);
    }
    task.updated_at = Some(now);

    tracing::debug!(id, "task updated");
    Ok(&roadmap.tasks[index])
}

fn check_references(roadmap: &Roadmap, depends_on: &[String], blocks: &[String]) -> Result<()> {
    let unknown: Vec<&str> = depends_on
        .iter()
        .chain(blocks)
        .filter(|id| find_task(roadmap, id).is_none())
        .map(String::as_str)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(RoadmapError::InvalidTask(format!(
            "unknown task references: {}",
            unknown.join(", ")
        )))
    }
}
