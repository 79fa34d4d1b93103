//! Add a task.

use super::{load_for_edit, save_checked};
use anyhow::Result;
use chrono::Utc;
use console::style;
use roadmap_core::{add_task, NewTask, RoadmapContext};

/// Append a task with the next free ID for its type.
pub fn run(ctx: &mut RoadmapContext, new: NewTask) -> Result<()> {
    let (original, mut roadmap) = load_for_edit(ctx)?;
    let task = add_task(&mut roadmap, new, Utc::now())?.clone();
    save_checked(ctx, &original, &roadmap)?;

    println!(
        "Created task {}: {}",
        style(&task.id).cyan().bold(),
        task.title
    );
    Ok(())
}
