use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::{bearer_token, verify_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

const ADMIN_REQUIRED: &str = "Must be admin to access this";

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// If a bearer token is present and valid, store the user on the request.
///
/// A missing or invalid token is not an error here; route guards decide
/// whether a user is required.
pub async fn authenticate_jwt(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| bearer_token(value).to_string());

    if let Some(token) = header {
        match verify_token(&token, &state.jwt_secret) {
            Ok(claims) => {
                tracing::debug!("Authenticated {} (admin: {})", claims.username, claims.is_admin);
                request.extensions_mut().insert(CurrentUser::from(claims));
            }
            Err(e) => tracing::debug!("Ignoring bearer token: {}", e),
        }
    }

    next.run(request).await
}

/// Route guard: only admins pass.
pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<CurrentUser>() {
        Some(user) if user.is_admin => Ok(next.run(request).await),
        Some(user) => {
            tracing::warn!("Admin route denied for {}", user.username);
            Err(ApiError::unauthorized(ADMIN_REQUIRED))
        }
        None => Err(ApiError::unauthorized(ADMIN_REQUIRED)),
    }
}
