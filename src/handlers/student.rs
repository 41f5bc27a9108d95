//! Student handlers: list, create, read, delete.

use super::{body_to_map, parse_id};
use crate::error::AppError;
use crate::service::StudentService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let students = StudentService::list(state.store.as_ref()).await?;
    Ok((StatusCode::OK, Json(students)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let body = body_to_map(body)?;
    let student = StudentService::create(state.store.as_ref(), &body).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let student = StudentService::read(state.store.as_ref(), id).await?;
    Ok((StatusCode::OK, Json(student)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    StudentService::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
