//! `/jobs` routes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Job, JobFilter, JobNew, JobUpdate};
use crate::state::AppState;

/// POST /jobs - admin only
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<JobNew>, JsonRejection>,
) -> ApiResult<Job> {
    let Json(data) = payload?;
    let job = Job::create(state.db.as_ref(), data).await?;
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs?title=&minSalary=&hasEquity=
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<JobFilter>, QueryRejection>,
) -> ApiResult<Vec<Job>> {
    let Query(filter) = query?;
    let jobs = Job::find_all(state.db.as_ref(), &filter).await?;
    Ok(ApiResponse::ok("jobs", jobs))
}

/// GET /jobs/:id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Job> {
    let Path(id) = id?;
    let job = Job::get(state.db.as_ref(), id).await?;
    Ok(ApiResponse::ok("job", job))
}

/// PATCH /jobs/:id - admin only
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> ApiResult<Job> {
    let Path(id) = id?;
    let Json(data) = payload?;
    let job = Job::update(state.db.as_ref(), id, &data).await?;
    Ok(ApiResponse::ok("job", job))
}

/// DELETE /jobs/:id - admin only
pub async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<String> {
    let Path(id) = id?;
    Job::remove(state.db.as_ref(), id).await?;
    Ok(ApiResponse::ok("deleted", id.to_string()))
}
