//! Persistence seam for courses and students, plus database bootstrap.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::config::{ServerConfig, StoreBackend};
use crate::error::{AppError, ConfigError};
use crate::migration::apply_migrations;
use crate::model::{Course, CourseChanges, CourseFilter, CourseId, NewCourse, NewStudent, Student, StudentId};
use async_trait::async_trait;
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::Arc;

/// Storage operations behind the HTTP handlers. Implementations enforce that
/// memberships only reference existing students.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Round trip to the backing store, used by `/ready`.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, AppError>;

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, AppError>;

    async fn create_course(&self, input: &NewCourse) -> Result<Course, AppError>;

    /// Apply `changes` to a course. Returns `None` when the course does not exist.
    async fn update_course(&self, id: CourseId, changes: &CourseChanges) -> Result<Option<Course>, AppError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_course(&self, id: CourseId) -> Result<bool, AppError>;

    async fn list_students(&self) -> Result<Vec<Student>, AppError>;

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, AppError>;

    async fn create_student(&self, input: &NewStudent) -> Result<Student, AppError>;

    /// Removes the student and its course memberships.
    async fn delete_student(&self, id: StudentId) -> Result<bool, AppError>;

    /// Ids from `ids` with no matching student, in the order given.
    async fn missing_students(&self, ids: &[StudentId]) -> Result<Vec<StudentId>, AppError>;
}

/// Build the store selected by `config`. For Postgres this creates the database
/// if needed, connects a pool and applies the schema.
pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn CourseStore>, AppError> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            apply_migrations(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

/// Create the database named in `database_url` if it does not exist.
/// Connects to the `postgres` maintenance database on the same server.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| ConfigError::Invalid {
        var: "DATABASE_URL",
        reason: e.to_string(),
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::Invalid {
            var: "DATABASE_URL",
            reason: "no database path".into(),
        })?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, query)) => (name.trim(), Some(query)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(query) => format!("{}postgres?{}", base, query),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
