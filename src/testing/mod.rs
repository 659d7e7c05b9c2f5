use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::database::{DatabaseError, Row, Storage};
use crate::sql::Statement;

/// In-memory `Storage` that records every statement and replays queued
/// row sets in order. Once the queue is empty every statement returns no rows.
#[derive(Default)]
pub struct MemoryStorage {
    responses: Mutex<VecDeque<Vec<Row>>>,
    statements: Mutex<Vec<Statement>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next statement.
    pub fn respond(&self, rows: impl IntoIterator<Item = Value>) {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                other => panic!("rows must be JSON objects, got {}", other),
            })
            .collect();
        lock(&self.responses).push_back(rows);
    }

    pub fn statements(&self) -> Vec<Statement> {
        lock(&self.statements).clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, DatabaseError> {
        lock(&self.statements).push(statement.clone());
        Ok(lock(&self.responses).pop_front().unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
