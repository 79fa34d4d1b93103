use crate::harness::{Assertion, Scenario};
use roadmap_core::{TaskStatus, TaskType};

#[test]
fn test_init_then_add_tasks() {
    Scenario::new("init_then_add_tasks")
        .inits_project("Checkout")
        .adds_task(TaskType::Feature, "Payment API")
        .adds_related_task(TaskType::Feature, "Checkout page", &["F-001"], &[])
        .adds_task(TaskType::Bug, "Rounding error")
        .assert_task_count(3)
        .assert_task_exists("F-002")
        .assert_task_exists("B-001")
        .assert_ordered_before("F-001", "F-002")
        .assert_valid()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_ids_continue_after_existing_tasks() {
    Scenario::new("ids_continue")
        .from_fixture("default")
        .adds_task(TaskType::Feature, "Password reset")
        .adds_task(TaskType::Improvement, "Faster login")
        .assert_task_exists("F-003")
        .assert_task_exists("I-001")
        .assert_task_count(7)
        .assert_valid()
        .run()
        .unwrap();
}

#[test]
fn test_status_change_stamps_updated_at() {
    Scenario::new("status_change_stamps_updated_at")
        .inits_project("Checkout")
        .adds_task(TaskType::Feature, "Payment API")
        .wait_hours(3)
        .sets_status("F-001", TaskStatus::Completed)
        .assert_status("F-001", TaskStatus::Completed)
        .assert(Assertion::TaskUpdatedAfterCreated("F-001".into()))
        .run()
        .unwrap();
}

#[test]
fn test_update_unknown_task_fails() {
    Scenario::new("update_unknown_task")
        .from_fixture("default")
        .expect_failure("task-not-found")
        .sets_status("F-404", TaskStatus::Completed)
        .assert_task_count(5)
        .run()
        .unwrap();
}

#[test]
fn test_add_with_unknown_dependency_rejected() {
    Scenario::new("add_with_unknown_dependency")
        .from_fixture("default")
        .expect_failure("task")
        .adds_related_task(TaskType::Feature, "Orphan", &["F-999"], &[])
        .assert_task_count(5)
        .run()
        .unwrap();
}

#[test]
fn test_edit_closing_a_cycle_is_not_saved() {
    // F-002 -> F-001 -> P-001 already exists; P-001 -> F-002 would close it
    Scenario::new("edit_closing_cycle")
        .from_fixture("default")
        .expect_failure("circular")
        .sets_depends_on("P-001", &["F-002"])
        .assert(Assertion::NoCycle)
        .assert_valid()
        .run()
        .unwrap();
}

#[test]
fn test_dependencies_drive_order() {
    Scenario::new("dependencies_drive_order")
        .from_fixture("default")
        .assert_ordered_before("P-001", "F-001")
        .assert_ordered_before("F-001", "F-002")
        .sets_depends_on("R-001", &["F-002"])
        .assert_ordered_before("F-002", "R-001")
        .assert_valid()
        .run()
        .unwrap();
}
