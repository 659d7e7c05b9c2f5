//! Partial-update SET clause assembly.
//!
//! Given the fields a caller wants to change and a resource's field mapper,
//! `sql_for_partial_update` produces a `"column"=$N, ...` clause plus the
//! values in placeholder order:
//!
//! ```text
//! {firstName: "Aliya", age: 32} + {firstName -> first_name}
//!     => "first_name"=$1, "age"=$2    ["Aliya", 32]
//! ```
//!
//! Column names end up inside the SQL text, so every resolved column must be
//! a plain identifier. Values are always bound.

use serde_json::Value;

use super::error::SqlError;
use super::statement::{Params, Statement};

/// Static mapping from logical field names to storage column names.
/// Fields without an entry use their logical name as the column.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper {
    columns: &'static [(&'static str, &'static str)],
}

impl FieldMapper {
    pub const EMPTY: FieldMapper = FieldMapper { columns: &[] };

    pub const fn new(columns: &'static [(&'static str, &'static str)]) -> Self {
        Self { columns }
    }

    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.columns
            .iter()
            .find(|(logical, _)| *logical == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

/// Fields to change, in the order they were set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRequest {
    fields: Vec<(String, Value)>,
}

impl UpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Setting the same field twice keeps its original position.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for UpdateRequest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = UpdateRequest::new();
        for (field, value) in iter {
            request.set(field, value);
        }
        request
    }
}

/// SET clause and the parameters it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    set_cols: String,
    params: Params,
}

impl PartialUpdate {
    pub fn set_cols(&self) -> &str {
        &self.set_cols
    }

    pub fn values(&self) -> &[Value] {
        self.params.values()
    }

    /// `UPDATE <table> SET ... WHERE <key_column> = $N+1 RETURNING ...`
    ///
    /// The key is bound after the update values, so its placeholder is
    /// always one past the last SET placeholder.
    pub fn into_update(
        self,
        table: &str,
        key_column: &str,
        key: impl Into<Value>,
        returning: &str,
    ) -> Statement {
        let PartialUpdate { set_cols, mut params } = self;
        let key_idx = params.push(key);
        Statement::new(
            format!(
                "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
                table, set_cols, key_column, key_idx, returning
            ),
            params,
        )
    }
}

pub fn sql_for_partial_update(
    data: &UpdateRequest,
    mapper: &FieldMapper,
) -> Result<PartialUpdate, SqlError> {
    if data.is_empty() {
        return Err(SqlError::NoData);
    }

    let mut params = Params::new();
    let mut cols = Vec::with_capacity(data.len());
    for (field, value) in data.iter() {
        let column = mapper.column(field);
        if !is_identifier(column) {
            return Err(SqlError::InvalidField(field.to_string()));
        }
        let placeholder = params.push(value.clone());
        cols.push(format!("\"{}\"={}", column, placeholder));
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        params,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
