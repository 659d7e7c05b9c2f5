use std::sync::Arc;

use crate::database::Storage;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Storage>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(db: Arc<dyn Storage>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            jwt_secret: jwt_secret.into(),
        }
    }
}
