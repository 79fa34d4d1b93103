//! Dependency inspection for one task.

use super::task_line;
use anyhow::{Context, Result};
use console::style;
use roadmap_core::{
    find_task, get_blocked_tasks, get_depends_on_tasks, RoadmapContext, RoadmapError,
};

/// Print what `id` waits for and what waits for `id`.
pub fn run(ctx: &mut RoadmapContext, id: &str) -> Result<()> {
    let roadmap = ctx.load_roadmap().context("Failed to load roadmap")?;
    let task = find_task(&roadmap, id).ok_or_else(|| RoadmapError::TaskNotFound(id.into()))?;

    println!("{}", task_line(task));

    println!();
    println!("{}", style("Depends on:").bold());
    let prerequisites = get_depends_on_tasks(task, &roadmap.tasks);
    if prerequisites.is_empty() {
        println!("  (none)");
    }
    for dep in &prerequisites {
        println!("  {}", task_line(dep));
    }
    for missing in task
        .depends_on
        .iter()
        .filter(|dep| !prerequisites.iter().any(|t| &t.id == *dep))
    {
        println!("  {} {} (missing)", style("×").red(), missing);
    }

    println!();
    println!("{}", style("Needed by:").bold());
    let dependents = get_blocked_tasks(task, &roadmap.tasks);
    if dependents.is_empty() {
        println!("  (none)");
    }
    for dependent in &dependents {
        println!("  {}", task_line(dependent));
    }

    if !task.blocks.is_empty() {
        println!();
        println!("{} {}", style("Blocks:").bold(), task.blocks.join(", "));
    }
    Ok(())
}
