use std::fmt;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// Incoming student payload. Binding is strict: both fields are required
/// and type-checked; unknown fields in the request body are dropped.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Student {
    pub name: String,
    pub age: i64,
}

/// Request-time store failures. Each variant carries the underlying
/// cause as text for logging; the HTTP layer maps variants to fixed
/// client-facing messages.
#[derive(Debug)]
pub enum StoreError {
    Query(String),
    Decode(String),
    Insert(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Query(e) => write!(f, "query failed: {e}"),
            StoreError::Decode(e) => write!(f, "decode failed: {e}"),
            StoreError::Insert(e) => write!(f, "insert failed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Access to the students collection. Shared read-only after startup;
/// handlers hold it behind an `Arc` so tests can swap in a fake store.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Returns every stored document verbatim, identifier and any extra
    /// fields included. No pagination, filtering, or sorting.
    async fn find_all(&self) -> Result<Vec<Document>, StoreError>;

    /// Inserts one document built from the bound student and returns
    /// the database-assigned identifier.
    async fn insert_one(&self, student: &Student) -> Result<Bson, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_drops_unknown_fields() {
        let s: Student =
            serde_json::from_str(r#"{"name":"Ada","age":30,"favourite_colour":"green"}"#).unwrap();
        assert_eq!(s.name, "Ada");
        assert_eq!(s.age, 30);
    }

    #[test]
    fn binding_rejects_missing_or_mistyped_fields() {
        assert!(serde_json::from_str::<Student>(r#"{"name":"Ada"}"#).is_err());
        assert!(serde_json::from_str::<Student>(r#"{"age":30}"#).is_err());
        assert!(serde_json::from_str::<Student>(r#"{"name":"Ada","age":"thirty"}"#).is_err());
    }
}
