//! Update an existing task.

use super::{load_for_edit, save_checked, styled_status};
use anyhow::Result;
use chrono::Utc;
use console::style;
use roadmap_core::{update_task, RoadmapContext, TaskUpdate};

/// Apply the given field changes to task `id`.
pub fn run(ctx: &mut RoadmapContext, id: &str, update: TaskUpdate) -> Result<()> {
    let (original, mut roadmap) = load_for_edit(ctx)?;
    let task = update_task(&mut roadmap, id, update, Utc::now())?.clone();
    save_checked(ctx, &original, &roadmap)?;

    println!(
        "Updated task {}: status {}",
        style(&task.id).cyan().bold(),
        styled_status(task.status)
    );
    Ok(())
}
