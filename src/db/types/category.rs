use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A row of the `categories` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl Category {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        }
    }
}
