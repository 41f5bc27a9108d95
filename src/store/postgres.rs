//! Course store on PostgreSQL via sqlx.

use super::CourseStore;
use crate::error::AppError;
use crate::model::{Course, CourseChanges, CourseFilter, CourseId, NewCourse, NewStudent, Student, StudentId};
use crate::sql::{
    clear_course_students, delete_course, delete_student, insert_course, insert_course_students, insert_student,
    lock_course, select_course_by_id, select_courses, select_existing_student_ids, select_student_by_id,
    select_students, update_course_name, QueryBuf,
};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, Row};
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    async fn fetch_course(conn: &mut PgConnection, id: CourseId) -> Result<Option<Course>, AppError> {
        let row = prepared(&select_course_by_id(id)).fetch_optional(&mut *conn).await?;
        row.as_ref().map(course_from_row).transpose().map_err(AppError::from)
    }

    async fn replace_students(conn: &mut PgConnection, id: CourseId, students: &[StudentId]) -> Result<(), AppError> {
        prepared(&clear_course_students(id)).execute(&mut *conn).await?;
        if !students.is_empty() {
            prepared(&insert_course_students(id, students)).execute(&mut *conn).await?;
        }
        Ok(())
    }
}

fn prepared(q: &QueryBuf) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

fn course_from_row(row: &PgRow) -> Result<Course, sqlx::Error> {
    Ok(Course {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        students: row.try_get("students")?,
    })
}

fn student_from_row(row: &PgRow) -> Result<Student, sqlx::Error> {
    Ok(Student {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        birth_date: row.try_get("birth_date")?,
    })
}

#[async_trait]
impl CourseStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, AppError> {
        let rows = prepared(&select_courses(filter)).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(course_from_row).collect::<Result<_, _>>()?)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_course(&mut conn, id).await
    }

    async fn create_course(&self, input: &NewCourse) -> Result<Course, AppError> {
        let mut tx = self.pool.begin().await?;
        let row = prepared(&insert_course(&input.name)).fetch_one(&mut *tx).await?;
        let id: CourseId = row.try_get("id")?;
        if !input.students.is_empty() {
            prepared(&insert_course_students(id, &input.students)).execute(&mut *tx).await?;
        }
        let course = Self::fetch_course(&mut tx, id)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tx.commit().await?;
        Ok(course)
    }

    async fn update_course(&self, id: CourseId, changes: &CourseChanges) -> Result<Option<Course>, AppError> {
        let mut tx = self.pool.begin().await?;
        let q = match changes.name.as_deref() {
            Some(name) => update_course_name(id, name),
            None => lock_course(id),
        };
        if prepared(&q).fetch_optional(&mut *tx).await?.is_none() {
            return Ok(None);
        }
        if let Some(students) = &changes.students {
            Self::replace_students(&mut tx, id, students).await?;
        }
        let course = Self::fetch_course(&mut tx, id).await?;
        tx.commit().await?;
        Ok(course)
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool, AppError> {
        let row = prepared(&delete_course(id)).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        let rows = prepared(&select_students()).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(student_from_row).collect::<Result<_, _>>()?)
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, AppError> {
        let row = prepared(&select_student_by_id(id)).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(student_from_row).transpose()?)
    }

    async fn create_student(&self, input: &NewStudent) -> Result<Student, AppError> {
        let row = prepared(&insert_student(&input.name, input.birth_date))
            .fetch_one(&self.pool)
            .await?;
        Ok(student_from_row(&row)?)
    }

    async fn delete_student(&self, id: StudentId) -> Result<bool, AppError> {
        let row = prepared(&delete_student(id)).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn missing_students(&self, ids: &[StudentId]) -> Result<Vec<StudentId>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = prepared(&select_existing_student_ids(ids)).fetch_all(&self.pool).await?;
        let found = rows
            .iter()
            .map(|r| r.try_get::<StudentId, _>("id"))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}
