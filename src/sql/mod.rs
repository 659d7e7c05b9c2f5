pub mod error;
pub mod partial_update;
pub mod statement;

pub use error::SqlError;
pub use partial_update::{sql_for_partial_update, FieldMapper, PartialUpdate, UpdateRequest};
pub use statement::{Conditions, Params, Statement};
