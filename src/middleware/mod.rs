pub mod auth;
pub mod response;

pub use auth::{authenticate_jwt, ensure_admin, CurrentUser};
pub use response::{ApiResponse, ApiResult};
