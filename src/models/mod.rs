pub mod company;
pub mod job;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::database::{DatabaseError, Row};
use crate::sql::SqlError;

pub use company::{Company, CompanyDetail, CompanyFilter, CompanyJob, CompanyNew, CompanyUpdate};
pub use job::{Job, JobFilter, JobNew, JobUpdate};

/// Failures a resource operation reports to its caller
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Malformed row: {0}")]
    MalformedRow(#[from] serde_json::Error),
}

impl From<SqlError> for ModelError {
    fn from(err: SqlError) -> Self {
        ModelError::BadRequest(err.to_string())
    }
}

fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, ModelError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, ModelError> {
    rows.into_iter().map(from_row).collect()
}

/// Row from an `INSERT ... RETURNING`, which always yields one.
fn returned<T: DeserializeOwned>(row: Option<Row>) -> Result<T, ModelError> {
    match row {
        Some(row) => from_row(row),
        None => Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound).into()),
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), ModelError> {
    if condition {
        Ok(())
    } else {
        Err(ModelError::BadRequest(message.to_string()))
    }
}

/// `%term%` for ILIKE, with LIKE wildcards in the term escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
