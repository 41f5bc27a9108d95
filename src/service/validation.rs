//! Request validation: turns JSON bodies and query strings into typed inputs,
//! collecting messages per field.

use crate::error::{AppError, FieldErrors};
use crate::model::{CourseChanges, CourseFilter, NewCourse, NewStudent, StudentId};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashMap;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

/// Validation error for memberships that reference students which do not exist.
pub fn unknown_students(ids: &[StudentId]) -> AppError {
    let messages = ids
        .iter()
        .map(|id| format!("Invalid pk \"{}\" - object does not exist.", id))
        .collect();
    let mut errors = FieldErrors::new();
    errors.insert("students".into(), messages);
    AppError::Validation(errors)
}

#[derive(Default)]
struct Collector {
    errors: FieldErrors,
}

impl Collector {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(message.into());
    }

    fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Body for POST /courses/: `name` required, `students` optional.
    pub fn new_course(body: &Map<String, Value>) -> Result<NewCourse, AppError> {
        let mut c = Collector::default();
        let name = required_name(&mut c, body);
        let students = students_field(&mut c, body).unwrap_or_default();
        c.finish(NewCourse {
            name: name.unwrap_or_default(),
            students,
        })
    }

    /// Body for PUT (`partial == false`) or PATCH (`partial == true`).
    /// A full update requires `name` and treats a missing `students` as empty.
    pub fn course_changes(body: &Map<String, Value>, partial: bool) -> Result<CourseChanges, AppError> {
        let mut c = Collector::default();
        let name = if partial {
            body.get("name").and_then(|v| name_value(&mut c, v))
        } else {
            required_name(&mut c, body)
        };
        let students = students_field(&mut c, body);
        let students = if partial { students } else { Some(students.unwrap_or_default()) };
        c.finish(CourseChanges { name, students })
    }

    /// Body for POST /students/: `name` required, `birth_date` optional `YYYY-MM-DD` or null.
    pub fn new_student(body: &Map<String, Value>) -> Result<NewStudent, AppError> {
        let mut c = Collector::default();
        let name = required_name(&mut c, body);
        let birth_date = match body.get("birth_date") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    c.push("birth_date", "Date has wrong format. Use YYYY-MM-DD.");
                    None
                }
            },
            Some(_) => {
                c.push("birth_date", "Date has wrong format. Use YYYY-MM-DD.");
                None
            }
        };
        c.finish(NewStudent {
            name: name.unwrap_or_default(),
            birth_date,
        })
    }

    /// Exact-match filters from the list query string. Empty values are ignored,
    /// unknown parameters too.
    pub fn course_filter(params: &HashMap<String, String>) -> Result<CourseFilter, AppError> {
        let mut c = Collector::default();
        let id = match params.get("id").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(s) => match s.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    c.push("id", "Enter a number.");
                    None
                }
            },
            None => None,
        };
        let name = params.get("name").filter(|s| !s.is_empty()).cloned();
        c.finish(CourseFilter { id, name })
    }
}

fn required_name(c: &mut Collector, body: &Map<String, Value>) -> Option<String> {
    match body.get("name") {
        None | Some(Value::Null) => {
            c.push("name", REQUIRED);
            None
        }
        Some(v) => name_value(c, v),
    }
}

fn name_value(c: &mut Collector, v: &Value) -> Option<String> {
    match v {
        Value::String(s) if s.trim().is_empty() => {
            c.push("name", BLANK);
            None
        }
        Value::String(s) => Some(s.clone()),
        Value::Null => {
            c.push("name", "This field may not be null.");
            None
        }
        _ => {
            c.push("name", "Not a valid string.");
            None
        }
    }
}

/// Parses `students` into ids, dropping repeats. Numeric strings count as ids.
/// `None` when absent or invalid.
fn students_field(c: &mut Collector, body: &Map<String, Value>) -> Option<Vec<StudentId>> {
    let items = match body.get("students")? {
        Value::Array(items) => items,
        other => {
            c.push(
                "students",
                format!("Expected a list of items but got type \"{}\".", json_type(other)),
            );
            return None;
        }
    };
    let mut ids: Vec<StudentId> = Vec::with_capacity(items.len());
    let mut valid = true;
    for item in items {
        let id = match item {
            Value::String(s) => s.trim().parse().ok(),
            other => other.as_i64(),
        };
        match id {
            Some(id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            None => {
                valid = false;
                c.push(
                    "students",
                    format!("Incorrect type. Expected pk value, received {}.", json_type(item)),
                );
            }
        }
    }
    valid.then_some(ids)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
