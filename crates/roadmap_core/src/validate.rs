//! Roadmap document validation.
//!
//! Checks the raw JSON document for structural problems, per-task field
//! problems and duplicate IDs, then runs the dependency checks from
//! [`crate::graph`] over the relation lists of every task with an ID.
//! Every problem is collected; nothing short-circuits.

use crate::error::Result;
use crate::graph::validate_dependencies;
use crate::json_io;
use crate::types::{
    Priority, Roadmap, RoadmapMetadata, Task, TaskStatus, TaskType, ValidationError,
    ValidationErrorKind,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static TASK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]-\d{3}$").expect("task id pattern is valid"));

/// Returns true if `id` has the form `X-000`.
pub fn is_valid_task_id(id: &str) -> bool {
    TASK_ID.is_match(id)
}

/// Outcome of validating a roadmap file.
#[derive(Debug, Default, Clone)]
pub struct ValidationReport {
    /// Number of task entries in the document.
    pub tasks_checked: usize,
    /// Every problem found, in discovery order.
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Returns true if no problems were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of problems of one kind.
    pub fn count(&self, kind: ValidationErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    /// Returns a summary message.
    pub fn summary(&self) -> String {
        if self.is_valid() {
            return format!("Roadmap is valid. {} tasks checked.", self.tasks_checked);
        }

        let kinds = [
            ValidationErrorKind::Structure,
            ValidationErrorKind::Task,
            ValidationErrorKind::DuplicateId,
            ValidationErrorKind::MissingTask,
            ValidationErrorKind::InvalidReference,
            ValidationErrorKind::Circular,
        ];
        let parts: Vec<String> = kinds
            .iter()
            .filter_map(|&kind| match self.count(kind) {
                0 => None,
                n => Some(format!("{} {}", n, kind)),
            })
            .collect();
        format!("Roadmap has problems: {}", parts.join(", "))
    }
}

/// Validate a roadmap file on disk.
///
/// # Errors
///
/// Returns [`crate::RoadmapError::NotFound`] if the file is missing and
/// [`crate::RoadmapError::InvalidJson`] if it cannot be parsed. Validation problems
/// are reported in the returned [`ValidationReport`], not as errors.
pub fn validate_roadmap_file(path: &Path) -> Result<ValidationReport> {
    let document = json_io::read_value(path)?;
    Ok(validate_value(&document))
}

/// Validate an already parsed document, including dependency checks.
pub fn validate_value(document: &Value) -> ValidationReport {
    let mut report = ValidationReport {
        tasks_checked: document
            .get("tasks")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
        errors: validate_document(document),
    };

    if report.is_valid() {
        if let Err(e) = serde_json::from_value::<Roadmap>(document.clone()) {
            report.errors.push(structure(format!(
                "document does not match the roadmap shape: {}",
                e
            )));
        }
    }
    if let Some(relations) = relation_view(document) {
        report.errors.extend(validate_dependencies(&relations));
    }

    report
}

/// Check the shape of a raw roadmap document.
///
/// Returns `structure`, `task` and `duplicate-id` errors. Dependency
/// references are not checked here.
pub fn validate_document(document: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(root) = document.as_object() else {
        errors.push(structure("roadmap must be a JSON object"));
        return errors;
    };

    match root.get("$schema") {
        Some(Value::String(_)) => {}
        Some(_) => errors.push(structure("'$schema' must be a string")),
        None => errors.push(structure("missing '$schema'")),
    }

    match root.get("metadata") {
        Some(Value::Object(metadata)) => {
            for key in ["name", "description"] {
                match metadata.get(key) {
                    Some(Value::String(_)) => {}
                    Some(_) => errors.push(structure(format!("'metadata.{}' must be a string", key))),
                    None => errors.push(structure(format!("missing 'metadata.{}'", key))),
                }
            }
        }
        Some(_) => errors.push(structure("'metadata' must be an object")),
        None => errors.push(structure("missing 'metadata'")),
    }

    let tasks = match root.get("tasks") {
        Some(Value::Array(tasks)) => tasks,
        Some(_) => {
            errors.push(structure("'tasks' must be an array"));
            return errors;
        }
        None => {
            errors.push(structure("missing 'tasks'"));
            return errors;
        }
    };

    for (index, task) in tasks.iter().enumerate() {
        match task.as_object() {
            Some(fields) => check_task(index, fields, &mut errors),
            None => errors.push(ValidationError::new(
                ValidationErrorKind::Task,
                format!("task at index {} must be an object", index),
            )),
        }
    }

    check_duplicate_ids(tasks, &mut errors);
    errors
}

/// Tasks with a string ID and their relation lists, read straight from the
/// document so that field problems elsewhere in a task do not hide them.
/// Relation entries that are not strings are skipped.
fn relation_view(document: &Value) -> Option<Roadmap> {
    let tasks = document
        .get("tasks")?
        .as_array()?
        .iter()
        .filter_map(|task| {
            let id = task.get("id")?.as_str()?;
            let task_type = task
                .get("type")
                .and_then(Value::as_str)
                .and_then(|t| t.parse::<TaskType>().ok())
                .unwrap_or(TaskType::Feature);
            let mut relations = Task::new(id, task_type, "", "");
            relations.depends_on = string_items(task.get("depends-on"));
            relations.blocks = string_items(task.get("blocks"));
            Some(relations)
        })
        .collect();

    Some(Roadmap {
        schema: String::new(),
        metadata: RoadmapMetadata {
            name: String::new(),
            description: String::new(),
            created_by: None,
            created_at: None,
        },
        tasks,
        extra: Map::new(),
    })
}

fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn structure(message: impl Into<String>) -> ValidationError {
    ValidationError::new(ValidationErrorKind::Structure, message)
}

fn check_task(index: usize, fields: &Map<String, Value>, errors: &mut Vec<ValidationError>) {
    let id = fields.get("id").and_then(Value::as_str);
    let label = id.map_or_else(|| format!("task at index {}", index), |id| format!("task {}", id));
    let mut problem = |message: String| {
        let err = ValidationError::new(ValidationErrorKind::Task, format!("{}: {}", label, message));
        errors.push(match id {
            Some(id) => err.for_task(id),
            None => err,
        });
    };

    match fields.get("id") {
        Some(Value::String(id)) if !is_valid_task_id(id) => {
            problem(format!("id '{}' does not match X-000", id))
        }
        Some(Value::String(_)) => {}
        Some(_) => problem("'id' must be a string".into()),
        None => problem("missing 'id'".into()),
    }

    let task_type = match fields.get("type").map(|v| v.as_str().map(str::parse::<TaskType>)) {
        Some(Some(Ok(t))) => Some(t),
        Some(Some(Err(e))) => {
            problem(e);
            None
        }
        Some(None) => {
            problem("'type' must be a string".into());
            None
        }
        None => {
            problem("missing 'type'".into());
            None
        }
    };
    if let (Some(t), Some(id)) = (task_type, id) {
        if is_valid_task_id(id) && !id.starts_with(t.prefix()) {
            problem(format!(
                "id prefix does not match type '{}' (expected {}-)",
                t,
                t.prefix()
            ));
        }
    }

    check_enum::<TaskStatus>(fields, "status", &mut problem);
    check_enum::<Priority>(fields, "priority", &mut problem);

    match fields.get("title") {
        Some(Value::String(s)) if s.trim().is_empty() => problem("'title' must not be empty".into()),
        Some(Value::String(_)) => {}
        Some(_) => problem("'title' must be a string".into()),
        None => problem("missing 'title'".into()),
    }
    match fields.get("details") {
        Some(Value::String(s)) if s.trim().is_empty() => {
            problem("'details' must not be empty".into())
        }
        Some(Value::String(_)) => {}
        Some(_) => problem("'details' must be a string".into()),
        None => problem("missing 'details'".into()),
    }

    for key in ["depends-on", "blocks"] {
        match fields.get(key) {
            Some(v) if is_string_array(v) => {}
            Some(_) => problem(format!("'{}' must be an array of task IDs", key)),
            None => problem(format!("missing '{}'", key)),
        }
    }

    for key in ["tags", "github-refs"] {
        if fields.get(key).is_some_and(|v| !is_string_array(v)) {
            problem(format!("'{}' must be an array of strings", key));
        }
    }
    for key in ["notes", "assignedTo", "dueDate", "createdAt", "updatedAt"] {
        if fields.get(key).is_some_and(|v| !v.is_string()) {
            problem(format!("'{}' must be a string", key));
        }
    }
    if fields.get("effort").is_some_and(|v| !v.is_number()) {
        problem("'effort' must be a number".into());
    }
    if fields.get("passes-tests").is_some_and(|v| !v.is_boolean()) {
        problem("'passes-tests' must be a boolean".into());
    }
}

fn check_enum<T>(fields: &Map<String, Value>, key: &str, problem: &mut impl FnMut(String))
where
    T: std::str::FromStr<Err = String>,
{
    match fields.get(key) {
        Some(Value::String(s)) => {
            if let Err(e) = s.parse::<T>() {
                problem(e);
            }
        }
        Some(_) => problem(format!("'{}' must be a string", key)),
        None => problem(format!("missing '{}'", key)),
    }
}

fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

fn check_duplicate_ids(tasks: &[Value], errors: &mut Vec<ValidationError>) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for id in tasks
        .iter()
        .filter_map(|t| t.get("id").and_then(Value::as_str))
    {
        let count = seen.entry(id).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(id);
        }
    }

    for id in order {
        errors.push(
            ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {} appears {} times", id, seen[id]),
            )
            .for_task(id)
            .related(vec![id.to_string()]),
        );
    }
}
