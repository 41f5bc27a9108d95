//! Student routes: collection at /students/, items at /students/:id/.

use crate::handlers::student::{create, delete as delete_handler, list, read};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn student_routes(state: AppState) -> Router {
    Router::new()
        .route("/students/", get(list).post(create))
        .route("/students/:id/", get(read).delete(delete_handler))
        .with_state(state)
}
