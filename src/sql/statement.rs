use serde_json::Value;

/// Ordered positional parameters for a single statement.
///
/// A `$N` placeholder can only be obtained by pushing the value it binds,
/// so placeholder numbering and parameter order cannot drift apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Vec<Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return the placeholder bound to it.
    pub fn push(&mut self, value: impl Into<Value>) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// SQL text paired with the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params: params.values,
        }
    }

    /// Statement without placeholders.
    pub fn bare(sql: impl Into<String>) -> Self {
        Self::new(sql, Params::new())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// AND-joined WHERE terms.
#[derive(Debug, Default)]
pub struct Conditions {
    terms: Vec<String>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, term: impl Into<String>) {
        self.terms.push(term.into());
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Renders ` WHERE a AND b`, or an empty string when there are no terms.
    pub fn to_where_sql(&self) -> String {
        if self.terms.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.terms.join(" AND "))
        }
    }
}
