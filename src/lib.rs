pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod sql;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post, MethodRouter},
    Router,
};

use handlers::{companies, jobs};
use middleware::{authenticate_jwt, ensure_admin};

pub use state::AppState;

/// The full HTTP application. Every request passes through JWT
/// authentication; write routes additionally require an admin.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(company_routes())
        .merge(job_routes())
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), authenticate_jwt))
        .with_state(state)
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(companies::list).merge(admin(post(companies::create))),
        )
        .route(
            "/companies/:handle",
            get(companies::get).merge(admin(patch(companies::update).delete(companies::remove))),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).merge(admin(post(jobs::create))))
        .route(
            "/jobs/:id",
            get(jobs::get).merge(admin(patch(jobs::update).delete(jobs::remove))),
        )
}

fn admin(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn(ensure_admin))
}
