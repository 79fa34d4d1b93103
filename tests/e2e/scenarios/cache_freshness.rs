use crate::harness::{Assertion, Scenario};
use anyhow::ensure;
use chrono::Utc;
use roadmap_core::{Roadmap, RoadmapContext, TaskType};
use serde_json::json;

#[test]
fn test_repeat_load_served_from_memory() {
    Scenario::new("repeat_load")
        .from_fixture("default")
        .loads()
        .loads()
        .assert_same_instance()
        .assert_disk_reads(1)
        .run()
        .unwrap();
}

#[test]
fn test_external_edit_is_picked_up() {
    let replacement = json!({
        "$schema": "https://roadmap.dev/schemas/roadmap.schema.json",
        "metadata": { "name": "Replaced", "description": "" },
        "tasks": [{
            "id": "F-001",
            "type": "feature",
            "status": "completed",
            "priority": "low",
            "title": "Only task",
            "details": "Written by another tool",
            "depends-on": [],
            "blocks": []
        }]
    });

    Scenario::new("external_edit")
        .from_fixture("default")
        .loads()
        .replaces_roadmap(&replacement)
        .loads()
        .assert_fresh_instance()
        .assert_task_count(1)
        .assert_disk_reads(2)
        .run()
        .unwrap();
}

#[test]
fn test_invalidate_forces_reread() {
    Scenario::new("invalidate_forces_reread")
        .from_fixture("default")
        .loads()
        .invalidates_cache()
        .loads()
        .assert_fresh_instance()
        .assert_disk_reads(2)
        .run()
        .unwrap();
}

#[test]
fn test_reset_repository_starts_cold() {
    Scenario::new("reset_repository")
        .from_fixture("default")
        .loads()
        .resets_repository()
        .loads()
        .assert_fresh_instance()
        .assert_disk_reads(1)
        .assert(Assertion::CacheSize(1))
        .run()
        .unwrap();
}

#[test]
fn test_own_saves_keep_cache_warm() {
    Scenario::new("own_saves_keep_cache_warm")
        .inits_project("Checkout")
        .adds_task(TaskType::Feature, "Payment API")
        .adds_task(TaskType::Feature, "Checkout page")
        .loads()
        .assert_disk_reads(0)
        .assert_task_count(2)
        .run()
        .unwrap();
}

#[test]
fn test_removed_file_fails_load() {
    Scenario::new("removed_file")
        .from_fixture("default")
        .loads()
        .removes_externally("roadmap.json")
        .expect_failure("not-found")
        .loads()
        .run()
        .unwrap();
}

#[test]
fn test_lru_bound_from_config() {
    // fixture config sets cache.maxSize = 4
    Scenario::new("lru_bound_from_config")
        .from_fixture("default")
        .assert(Assertion::Custom(Box::new(|ctx: &mut RoadmapContext| -> anyhow::Result<()> {
            let dir = ctx.project_dir().to_path_buf();
            let repo = ctx.roadmap_repository()?;
            for i in 0..5 {
                let path = dir.join(format!("extra-{}.json", i));
                repo.save(&path, &Roadmap::new(format!("extra {}", i), "", None, Utc::now()))?;
            }
            ensure!(repo.cache_size() == 4, "cache size {}", repo.cache_size());
            ensure!(repo.stats().evictions == 1, "evictions {}", repo.stats().evictions);
            ensure!(!repo.is_cached(&dir.join("extra-0.json")), "oldest entry kept");
            ensure!(repo.is_cached(&dir.join("extra-4.json")), "newest entry missing");
            Ok(())
        })))
        .assert(Assertion::Evictions(1))
        .run()
        .unwrap();
}
