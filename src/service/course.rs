//! Course operations against a [`CourseStore`].

use crate::error::AppError;
use crate::model::{Course, CourseFilter, CourseId, StudentId};
use crate::service::{unknown_students, RequestValidator};
use crate::store::CourseStore;
use serde_json::{Map, Value};

pub struct CourseService;

impl CourseService {
    /// All courses matching `filter`, in insertion order.
    pub async fn list(store: &dyn CourseStore, filter: &CourseFilter) -> Result<Vec<Course>, AppError> {
        store.list_courses(filter).await
    }

    pub async fn read(store: &dyn CourseStore, id: CourseId) -> Result<Course, AppError> {
        store.get_course(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create(store: &dyn CourseStore, body: &Map<String, Value>) -> Result<Course, AppError> {
        let input = RequestValidator::new_course(body)?;
        Self::check_students(store, &input.students).await?;
        let course = store.create_course(&input).await?;
        tracing::info!(course_id = course.id, students = course.students.len(), "course created");
        Ok(course)
    }

    /// PUT when `partial` is false, PATCH otherwise. Supplied `students` replace
    /// the membership set entirely. A missing course is reported before any body errors.
    pub async fn update(
        store: &dyn CourseStore,
        id: CourseId,
        body: &Map<String, Value>,
        partial: bool,
    ) -> Result<Course, AppError> {
        let current = Self::read(store, id).await?;
        let changes = RequestValidator::course_changes(body, partial)?;
        if changes.is_empty() {
            return Ok(current);
        }
        if let Some(students) = &changes.students {
            Self::check_students(store, students).await?;
        }
        let course = store.update_course(id, &changes).await?.ok_or_else(|| not_found(id))?;
        tracing::info!(course_id = id, "course updated");
        Ok(course)
    }

    pub async fn delete(store: &dyn CourseStore, id: CourseId) -> Result<(), AppError> {
        if !store.delete_course(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(course_id = id, "course deleted");
        Ok(())
    }

    async fn check_students(store: &dyn CourseStore, ids: &[StudentId]) -> Result<(), AppError> {
        let missing = store.missing_students(ids).await?;
        if missing.is_empty() {
            Ok(())
        } else {
            Err(unknown_students(&missing))
        }
    }
}

fn not_found(id: CourseId) -> AppError {
    AppError::NotFound(format!("course {}", id))
}
