//! Course API: REST resources for courses and the students enrolled in them.

pub mod config;
pub mod error;
pub mod migration;
pub mod model;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::{load_from_env, ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::{Course, CourseFilter, Student};
pub use state::AppState;
pub use store::{ensure_database_exists, open_store, CourseStore, MemoryStore, PgStore};
pub use routes::{app, common_routes_with_ready, course_routes, student_routes};
pub use service::{CourseService, StudentService};
