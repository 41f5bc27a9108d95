//! HTTP handlers for the course and student resources.

pub mod course;
pub mod student;

use crate::error::AppError;
use serde_json::{Map, Value};

/// Path ids are integers; anything else is a bad request rather than a 404.
pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

pub(crate) fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}
