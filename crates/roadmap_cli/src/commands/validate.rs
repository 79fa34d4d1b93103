//! Roadmap validation command.

use anyhow::{bail, Result};
use console::style;
use roadmap_core::{validate_roadmap_file, RoadmapContext, ValidationErrorKind};

/// Validate the roadmap file and report every problem.
pub fn run(ctx: &mut RoadmapContext) -> Result<()> {
    let path = ctx.roadmap_path()?;
    let report = validate_roadmap_file(&path)?;

    println!();
    println!("{}", style("Validation Report:").bold());
    println!("  File:           {}", path.display());
    println!("  Tasks checked:  {}", style(report.tasks_checked).cyan());

    for error in &report.errors {
        let marker = match error.kind {
            ValidationErrorKind::Circular | ValidationErrorKind::MissingTask => style("×").red(),
            _ => style("⚠").yellow(),
        };
        println!("    {} {}", marker, error);
    }

    println!();
    if report.is_valid() {
        println!("{} {}", style("✓").green(), style(report.summary()).green());
        return Ok(());
    }

    println!("{}", style(report.summary()).yellow().bold());
    if report.count(ValidationErrorKind::Circular) > 0 {
        println!();
        println!("{}", style("Recommendations:").bold());
        println!(
            "  {} Break the cycle with {}",
            style("→").cyan(),
            style("roadmap update <id> --depends-on ...").cyan()
        );
    }
    bail!("{} validation problem(s) found", report.errors.len())
}
