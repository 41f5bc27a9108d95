//! Student operations against a [`CourseStore`].

use crate::error::AppError;
use crate::model::{Student, StudentId};
use crate::service::RequestValidator;
use crate::store::CourseStore;
use serde_json::{Map, Value};

pub struct StudentService;

impl StudentService {
    pub async fn list(store: &dyn CourseStore) -> Result<Vec<Student>, AppError> {
        store.list_students().await
    }

    pub async fn read(store: &dyn CourseStore, id: StudentId) -> Result<Student, AppError> {
        store.get_student(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create(store: &dyn CourseStore, body: &Map<String, Value>) -> Result<Student, AppError> {
        let input = RequestValidator::new_student(body)?;
        let student = store.create_student(&input).await?;
        tracing::info!(student_id = student.id, "student created");
        Ok(student)
    }

    /// Deleting a student also removes it from every course it belonged to.
    pub async fn delete(store: &dyn CourseStore, id: StudentId) -> Result<(), AppError> {
        if !store.delete_student(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(student_id = id, "student deleted");
        Ok(())
    }
}

fn not_found(id: StudentId) -> AppError {
    AppError::NotFound(format!("student {}", id))
}
