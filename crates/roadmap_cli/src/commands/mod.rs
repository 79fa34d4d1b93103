//! CLI commands.

pub mod add;
pub mod deps;
pub mod init;
pub mod list;
pub mod show;
pub mod update;
pub mod validate;

use anyhow::{bail, Context, Result};
use console::{style, StyledObject};
use roadmap_core::{
    validate_dependencies, Priority, Roadmap, RoadmapContext, Task, TaskStatus, ValidationError,
    ValidationErrorKind,
};
use std::sync::Arc;

/// Load the project's roadmap: the shared copy as loaded, plus an owned copy
/// ready for mutation.
pub(crate) fn load_for_edit(ctx: &mut RoadmapContext) -> Result<(Arc<Roadmap>, Roadmap)> {
    let original = ctx.load_roadmap().context("Failed to load roadmap")?;
    let edited = (*original).clone();
    Ok((original, edited))
}

/// Dependency problems present in `after` but not in `before`.
///
/// A cycle counts as new only if `before` had none.
pub(crate) fn introduced_problems(before: &Roadmap, after: &Roadmap) -> Vec<ValidationError> {
    let existing = validate_dependencies(before);
    validate_dependencies(after)
        .into_iter()
        .filter(|problem| {
            !existing.iter().any(|old| {
                old.kind == problem.kind
                    && (problem.kind == ValidationErrorKind::Circular
                        || old.message == problem.message)
            })
        })
        .collect()
}

/// Reject edits that introduce dependency problems, then persist.
pub(crate) fn save_checked(
    ctx: &mut RoadmapContext,
    before: &Roadmap,
    after: &Roadmap,
) -> Result<()> {
    let problems = introduced_problems(before, after);
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("  {} {}", style("×").red(), problem);
        }
        bail!("change rejected: {} dependency problem(s)", problems.len());
    }
    ctx.save_roadmap(after).context("Failed to save roadmap")
}

pub(crate) fn styled_status(status: TaskStatus) -> StyledObject<&'static str> {
    let text = style(status.as_str());
    match status {
        TaskStatus::NotStarted => text.dim(),
        TaskStatus::InProgress => text.yellow(),
        TaskStatus::Completed => text.green(),
    }
}

pub(crate) fn styled_priority(priority: Priority) -> StyledObject<&'static str> {
    let text = style(priority.as_str());
    match priority {
        Priority::High => text.red(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.dim(),
    }
}

/// One-line summary used by `list` and `deps`.
pub(crate) fn task_line(task: &Task) -> String {
    format!(
        "{} [{}] {} ({})",
        style(&task.id).cyan().bold(),
        styled_status(task.status),
        task.title,
        styled_priority(task.priority)
    )
}
