pub mod manager;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::sql::Statement;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgStorage;

/// A result row keyed by (aliased) column name.
pub type Row = Map<String, Value>;

/// Executes parameterized statements and hands rows back as JSON objects.
///
/// Models only talk to the database through this trait, which keeps them
/// testable without a running PostgreSQL.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, DatabaseError>;

    async fn fetch_optional(&self, statement: &Statement) -> Result<Option<Row>, DatabaseError> {
        Ok(self.fetch_all(statement).await?.into_iter().next())
    }

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), DatabaseError>;
}
