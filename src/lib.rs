//! Student registration and attendance check-in server.
//!
//! Students register once with a unique email and student ID, then check in
//! as often as they like. Only the latest check-in per student is kept.

pub mod config;
pub mod err;
pub mod frontend;
pub mod inject;
pub mod models;
pub mod query;
pub mod recorder;
pub mod registry;
pub mod routes;
pub mod state;
pub mod store;
pub mod validate;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{any, get};
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiRoutes;
use crate::state::AppState;

pub fn app(state: AppState, api: &ApiRoutes) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route(
            &api.students,
            get(routes::list_students).post(routes::register_student),
        )
        .route(
            &api.checkins,
            get(routes::list_checkins).post(routes::record_checkin),
        )
        .fallback(any(frontend::fallback))
        .layer(Extension(state))
        .layer(cors)
}
