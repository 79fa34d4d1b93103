//! Initialize a project roadmap.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use console::style;
use roadmap_core::{Config, Roadmap, RoadmapContext, PROJECT_CONFIG_FILE};

/// Write `.roadmaprc.json` and an empty roadmap in the project directory.
pub fn run(
    ctx: &mut RoadmapContext,
    name: &str,
    description: &str,
    path: &str,
    force: bool,
) -> Result<()> {
    let config_path = ctx.project_dir().join(PROJECT_CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    Config::new(path, name, description)
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    ctx.reset_config_repository();
    ctx.reset_roadmap_repository();

    let roadmap_path = ctx.roadmap_path()?;
    if roadmap_path.exists() && !force {
        println!(
            "Keeping existing roadmap at {}",
            style(roadmap_path.display()).cyan()
        );
    } else {
        let created_by = std::env::var("USER").ok();
        let roadmap = Roadmap::new(name, description, created_by, Utc::now());
        ctx.save_roadmap(&roadmap)
            .context("Failed to write roadmap")?;
        println!(
            "Created roadmap at {}",
            style(roadmap_path.display()).cyan()
        );
    }

    println!("Configuration written to {}", PROJECT_CONFIG_FILE);
    println!();
    println!("Next steps:");
    println!(
        "  {} {}",
        style("→").cyan(),
        style("roadmap add feature \"Title\" --details \"...\"").cyan()
    );
    println!("  {} {}", style("→").cyan(), style("roadmap list").cyan());
    Ok(())
}
