//! Apply the course schema to the database: students, courses and their join table.
//! Order follows foreign key dependencies.

use crate::error::AppError;
use crate::sql::{quoted, COURSES_TABLE, COURSE_STUDENTS_TABLE, STUDENTS_TABLE};
use sqlx::PgPool;

fn ddl() -> Vec<String> {
    let students = quoted(STUDENTS_TABLE);
    let courses = quoted(COURSES_TABLE);
    let join = quoted(COURSE_STUDENTS_TABLE);
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {students} (
                "id" BIGSERIAL PRIMARY KEY,
                "name" TEXT NOT NULL,
                "birth_date" DATE
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {courses} (
                "id" BIGSERIAL PRIMARY KEY,
                "name" TEXT NOT NULL
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {join} (
                "id" BIGSERIAL PRIMARY KEY,
                "course_id" BIGINT NOT NULL REFERENCES {courses} ("id") ON DELETE CASCADE,
                "student_id" BIGINT NOT NULL REFERENCES {students} ("id") ON DELETE CASCADE,
                UNIQUE ("course_id", "student_id")
            )
            "#
        ),
        format!(
            r#"CREATE INDEX IF NOT EXISTS "course_students_student_id_idx" ON {join} ("student_id")"#
        ),
        format!(r#"CREATE INDEX IF NOT EXISTS "courses_name_idx" ON {courses} ("name")"#),
    ]
}

/// Create the tables if they do not exist. Safe to run on every start.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for sql in ddl() {
        tracing::debug!(sql = %sql.trim(), "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!("schema up to date");
    Ok(())
}
