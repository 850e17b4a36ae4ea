use thiserror::Error;

use microhabit_core::habits::StoreError;

pub mod memory;
pub mod suggestion;

pub use memory::InMemorySuggestionStore;
pub use suggestion::SqlSuggestionStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for StoreError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Database(source) => StoreError::Backend(source.to_string()),
            RepositoryError::Decode(message) => StoreError::Decode(message),
        }
    }
}
