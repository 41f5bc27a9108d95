//! In-process course store. Same semantics as the Postgres store; state is lost on exit.

use super::CourseStore;
use crate::error::AppError;
use crate::model::{Course, CourseChanges, CourseFilter, CourseId, NewCourse, NewStudent, Student, StudentId};
use crate::service::unknown_students;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    last_course_id: CourseId,
    last_student_id: StudentId,
    // BTreeMap keyed by monotonically assigned ids keeps insertion order.
    courses: BTreeMap<CourseId, CourseRow>,
    students: BTreeMap<StudentId, Student>,
}

struct CourseRow {
    name: String,
    students: Vec<StudentId>,
}

impl Tables {
    fn course(&self, id: CourseId) -> Option<Course> {
        self.courses.get(&id).map(|row| Course {
            id,
            name: row.name.clone(),
            students: row.students.clone(),
        })
    }

    fn check_students(&self, ids: &[StudentId]) -> Result<(), AppError> {
        let missing: Vec<StudentId> = ids.iter().copied().filter(|id| !self.students.contains_key(id)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(unknown_students(&missing))
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, AppError> {
        let tables = self.read();
        Ok(tables
            .courses
            .keys()
            .filter_map(|id| tables.course(*id))
            .filter(|c| filter.matches(c))
            .collect())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, AppError> {
        Ok(self.read().course(id))
    }

    async fn create_course(&self, input: &NewCourse) -> Result<Course, AppError> {
        let mut tables = self.write();
        tables.check_students(&input.students)?;
        tables.last_course_id += 1;
        let id = tables.last_course_id;
        tables.courses.insert(
            id,
            CourseRow {
                name: input.name.clone(),
                students: input.students.clone(),
            },
        );
        tables.course(id).ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update_course(&self, id: CourseId, changes: &CourseChanges) -> Result<Option<Course>, AppError> {
        let mut tables = self.write();
        if let Some(students) = &changes.students {
            tables.check_students(students)?;
        }
        let Some(row) = tables.courses.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(students) = &changes.students {
            row.students = students.clone();
        }
        Ok(tables.course(id))
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool, AppError> {
        Ok(self.write().courses.remove(&id).is_some())
    }

    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        Ok(self.read().students.values().cloned().collect())
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, AppError> {
        Ok(self.read().students.get(&id).cloned())
    }

    async fn create_student(&self, input: &NewStudent) -> Result<Student, AppError> {
        let mut tables = self.write();
        tables.last_student_id += 1;
        let student = Student {
            id: tables.last_student_id,
            name: input.name.clone(),
            birth_date: input.birth_date,
        };
        tables.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn delete_student(&self, id: StudentId) -> Result<bool, AppError> {
        let mut tables = self.write();
        if tables.students.remove(&id).is_none() {
            return Ok(false);
        }
        for row in tables.courses.values_mut() {
            row.students.retain(|s| *s != id);
        }
        Ok(true)
    }

    async fn missing_students(&self, ids: &[StudentId]) -> Result<Vec<StudentId>, AppError> {
        let tables = self.read();
        Ok(ids.iter().copied().filter(|id| !tables.students.contains_key(id)).collect())
    }
}
