//! `/companies` routes.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Company, CompanyDetail, CompanyFilter, CompanyNew, CompanyUpdate};
use crate::state::AppState;

/// POST /companies - admin only
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CompanyNew>, JsonRejection>,
) -> ApiResult<Company> {
    let Json(data) = payload?;
    let company = Company::create(state.db.as_ref(), data).await?;
    Ok(ApiResponse::created("company", company))
}

/// GET /companies?nameLike=&minEmployees=&maxEmployees=
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<CompanyFilter>, QueryRejection>,
) -> ApiResult<Vec<Company>> {
    let Query(filter) = query?;
    let companies = Company::find_all(state.db.as_ref(), &filter).await?;
    Ok(ApiResponse::ok("companies", companies))
}

/// GET /companies/:handle
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    let company = Company::get(state.db.as_ref(), &handle).await?;
    Ok(ApiResponse::ok("company", company))
}

/// PATCH /companies/:handle - admin only
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    payload: Result<Json<CompanyUpdate>, JsonRejection>,
) -> ApiResult<Company> {
    let Json(data) = payload?;
    let company = Company::update(state.db.as_ref(), &handle, &data).await?;
    Ok(ApiResponse::ok("company", company))
}

/// DELETE /companies/:handle - admin only
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<String> {
    Company::remove(state.db.as_ref(), &handle).await?;
    Ok(ApiResponse::ok("deleted", handle))
}
