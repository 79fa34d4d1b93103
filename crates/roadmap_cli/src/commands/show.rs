//! Show a single task.

use super::{styled_priority, styled_status};
use anyhow::{Context, Result};
use console::style;
use roadmap_core::{find_task, RoadmapContext, RoadmapError};

pub fn run(ctx: &mut RoadmapContext, id: &str) -> Result<()> {
    let roadmap = ctx.load_roadmap().context("Failed to load roadmap")?;
    let task = find_task(&roadmap, id).ok_or_else(|| RoadmapError::TaskNotFound(id.into()))?;

    println!("{} {}", style(&task.id).cyan().bold(), style(&task.title).bold());
    println!("  Type:        {}", task.task_type);
    println!("  Status:      {}", styled_status(task.status));
    println!("  Priority:    {}", styled_priority(task.priority));
    if !task.depends_on.is_empty() {
        println!("  Depends on:  {}", task.depends_on.join(", "));
    }
    if !task.blocks.is_empty() {
        println!("  Blocks:      {}", task.blocks.join(", "));
    }
    if let Some(tags) = task.tags.as_ref().filter(|t| !t.is_empty()) {
        println!("  Tags:        {}", tags.join(", "));
    }
    if let Some(assignee) = &task.assigned_to {
        println!("  Assigned to: {}", assignee);
    }
    if let Some(due) = &task.due_date {
        println!("  Due:         {}", due);
    }
    if let Some(effort) = task.effort {
        println!("  Effort:      {}", effort);
    }
    if let Some(passes) = task.passes_tests {
        let text = if passes {
            style("passing").green()
        } else {
            style("failing").red()
        };
        println!("  Tests:       {}", text);
    }
    if let Some(updated) = task.updated_at {
        println!("  Updated:     {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }

    println!();
    println!("{}", task.details);
    if let Some(notes) = &task.notes {
        println!();
        println!("{}", style("Notes:").bold());
        println!("{}", notes);
    }
    Ok(())
}
