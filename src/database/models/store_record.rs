use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Entry of a workspace's record store, used to auto-fill select options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoreRecord {
    pub name: String,
    pub alternate_code: String,
}

impl StoreRecord {
    pub fn new(name: impl Into<String>, alternate_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alternate_code: alternate_code.into(),
        }
    }
}
