//! List tasks.

use super::task_line;
use anyhow::{Context, Result};
use console::style;
use roadmap_core::{topological_sort, RoadmapContext, Task, TaskStatus, TaskType};

/// Print tasks in file order, or dependency order with `sorted`.
pub fn run(
    ctx: &mut RoadmapContext,
    sorted: bool,
    status: Option<TaskStatus>,
    task_type: Option<TaskType>,
) -> Result<()> {
    let roadmap = ctx.load_roadmap().context("Failed to load roadmap")?;

    let ordered: Vec<Task> = if sorted {
        topological_sort(&roadmap.tasks)?
    } else {
        roadmap.tasks.clone()
    };

    let shown: Vec<&Task> = ordered
        .iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .filter(|t| task_type.map_or(true, |ty| t.task_type == ty))
        .collect();

    println!("{}", style(&roadmap.metadata.name).bold());
    if shown.is_empty() {
        println!("  (no tasks)");
        return Ok(());
    }
    for task in &shown {
        println!("  {}", task_line(task));
    }
    println!();
    println!(
        "{} of {} tasks",
        style(shown.len()).cyan(),
        roadmap.tasks.len()
    );
    Ok(())
}
