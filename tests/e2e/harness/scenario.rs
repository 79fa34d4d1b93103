use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::ScenarioStep;
use super::workspace::USER_CONFIG_FILE;
use roadmap_core::{TaskStatus, TaskType, ValidationErrorKind, PROJECT_CONFIG_FILE};
use std::collections::HashMap;

/// Fluent DSL for building test scenarios
pub struct Scenario {
    name: String,
    fixture: Option<String>,
    initial_files: HashMap<String, Vec<u8>>,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fixture: None,
            initial_files: HashMap::new(),
            steps: Vec::new(),
        }
    }

    // ===== Initial setup =====

    /// Add a single file to initial workspace
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.initial_files
            .insert(path.to_string(), content.to_vec());
        self
    }

    /// Seed the roadmap file with a JSON document
    pub fn with_roadmap(self, roadmap: &serde_json::Value) -> Self {
        let config = serde_json::json!({ "path": "roadmap.json" });
        self.with_project_config(&config)
            .with_file("roadmap.json", roadmap.to_string().as_bytes())
    }

    /// Seed the project-level config
    pub fn with_project_config(self, config: &serde_json::Value) -> Self {
        self.with_file(PROJECT_CONFIG_FILE, config.to_string().as_bytes())
    }

    /// Seed the user-level config
    pub fn with_user_config(self, config: &serde_json::Value) -> Self {
        self.with_file(USER_CONFIG_FILE, config.to_string().as_bytes())
    }

    /// Load initial workspace from fixtures; `with_*` files are laid over it
    pub fn from_fixture(mut self, fixture_name: &str) -> Self {
        self.fixture = Some(fixture_name.to_string());
        self
    }

    // ===== Project actions =====

    /// Write a project config and an empty roadmap
    pub fn inits_project(mut self, name: &str) -> Self {
        self.steps.push(ScenarioStep::InitProject {
            name: name.to_string(),
        });
        self
    }

    /// Add a task with no relations
    pub fn adds_task(self, task_type: TaskType, title: &str) -> Self {
        self.adds_related_task(task_type, title, &[], &[])
    }

    /// Add a task with prerequisites and blocked tasks
    pub fn adds_related_task(
        mut self,
        task_type: TaskType,
        title: &str,
        depends_on: &[&str],
        blocks: &[&str],
    ) -> Self {
        self.steps.push(ScenarioStep::AddTask {
            task_type,
            title: title.to_string(),
            details: format!("Details for {}", title),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            blocks: blocks.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Change a task's status
    pub fn sets_status(mut self, id: &str, status: TaskStatus) -> Self {
        self.steps.push(ScenarioStep::SetStatus {
            id: id.to_string(),
            status,
        });
        self
    }

    /// Replace a task's prerequisites
    pub fn sets_depends_on(mut self, id: &str, depends_on: &[&str]) -> Self {
        self.steps.push(ScenarioStep::SetDependsOn {
            id: id.to_string(),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    // ===== Repository access =====

    /// Load the roadmap through the repository
    pub fn loads(mut self) -> Self {
        self.steps.push(ScenarioStep::Load);
        self
    }

    /// Drop the cached roadmap entry
    pub fn invalidates_cache(mut self) -> Self {
        self.steps.push(ScenarioStep::InvalidateCache);
        self
    }

    /// Dispose the roadmap repository
    pub fn resets_repository(mut self) -> Self {
        self.steps.push(ScenarioStep::ResetRepository);
        self
    }

    /// Drop the config repository
    pub fn resets_config(mut self) -> Self {
        self.steps.push(ScenarioStep::ResetConfig);
        self
    }

    // ===== Outside changes =====

    /// Overwrite a workspace file behind the repository's back
    pub fn edits_externally(mut self, path: &str, content: &[u8]) -> Self {
        self.steps.push(ScenarioStep::ExternalWrite {
            path: path.to_string(),
            content: content.to_vec(),
        });
        self
    }

    /// Replace the roadmap file behind the repository's back
    pub fn replaces_roadmap(self, roadmap: &serde_json::Value) -> Self {
        self.edits_externally("roadmap.json", roadmap.to_string().as_bytes())
    }

    /// Delete a workspace file behind the repository's back
    pub fn removes_externally(mut self, path: &str) -> Self {
        self.steps.push(ScenarioStep::ExternalRemove {
            path: path.to_string(),
        });
        self
    }

    // ===== Time control =====

    /// Wait for N hours
    pub fn wait_hours(mut self, hours: i64) -> Self {
        self.steps.push(ScenarioStep::WaitHours { hours });
        self
    }

    // ===== Failure expectations =====

    /// The next step must fail with the given error code
    pub fn expect_failure(mut self, code: &str) -> Self {
        self.steps.push(ScenarioStep::ExpectFailure {
            code: code.to_string(),
        });
        self
    }

    // ===== Assertions =====

    /// Add a general assertion
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert number of tasks in the roadmap
    pub fn assert_task_count(self, count: usize) -> Self {
        self.assert(Assertion::TaskCount(count))
    }

    /// Assert a task exists
    pub fn assert_task_exists(self, id: &str) -> Self {
        self.assert(Assertion::TaskExists(id.to_string()))
    }

    /// Assert a task's status
    pub fn assert_status(self, id: &str, status: TaskStatus) -> Self {
        self.assert(Assertion::TaskStatus {
            id: id.to_string(),
            status,
        })
    }

    /// Assert dependency order between two tasks
    pub fn assert_ordered_before(self, first: &str, second: &str) -> Self {
        self.assert(Assertion::OrderedBefore {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// Assert the roadmap file has no problems
    pub fn assert_valid(self) -> Self {
        self.assert(Assertion::RoadmapValid)
    }

    /// Assert number of validation errors of one kind
    pub fn assert_validation_errors(self, kind: ValidationErrorKind, count: usize) -> Self {
        self.assert(Assertion::ValidationErrors { kind, count })
    }

    /// Assert the last two loads returned the same instance
    pub fn assert_same_instance(self) -> Self {
        self.assert(Assertion::SameInstanceAsPrevious)
    }

    /// Assert the last two loads returned different instances
    pub fn assert_fresh_instance(self) -> Self {
        self.assert(Assertion::FreshInstance)
    }

    /// Assert number of files read from disk by the repository
    pub fn assert_disk_reads(self, reads: u64) -> Self {
        self.assert(Assertion::DiskReads(reads))
    }

    // ===== Execution =====

    /// Execute the scenario and return results
    pub fn run(self) -> ScenarioResult {
        let mut runner = match ScenarioRunner::new(self.fixture.as_deref(), self.initial_files) {
            Ok(r) => r,
            Err(e) => {
                return ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: 0,
                    failure_step: Some(0),
                    error: Some(format!("Failed to create runner: {:#}", e)),
                }
            }
        };

        match runner.execute(&self.steps) {
            Ok(()) => ScenarioResult {
                name: self.name,
                success: true,
                steps_executed: self.steps.len(),
                failure_step: None,
                error: None,
            },
            Err(e) => {
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(format!("{:?}", e)),
                }
            }
        }
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
}
