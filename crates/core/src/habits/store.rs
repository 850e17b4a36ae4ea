//! Persistence capability for generated suggestions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::types::{SuggestionRecord, SuggestionResult, SuggestionStatus};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("suggestion store backend failed: {0}")]
    Backend(String),
    #[error("could not decode stored suggestion: {0}")]
    Decode(String),
}

/// Per-user suggestion storage.
///
/// Every lookup is scoped to `user_id`; a suggestion belonging to another user
/// is reported as absent.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Stores a suggestion as `pending` and returns its id, or `None` when the
    /// store keeps nothing.
    async fn store(
        &self,
        user_id: &str,
        result: &SuggestionResult,
    ) -> Result<Option<String>, StoreError>;

    /// Returns `false` when no matching suggestion exists.
    async fn update_status(
        &self,
        user_id: &str,
        suggestion_id: &str,
        status: SuggestionStatus,
        completed: bool,
    ) -> Result<bool, StoreError>;

    async fn get(
        &self,
        user_id: &str,
        suggestion_id: &str,
    ) -> Result<Option<SuggestionRecord>, StoreError>;

    /// Newest first.
    async fn list_recent(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<SuggestionRecord>, StoreError>;

    /// Most recent suggestion created at or after `since`.
    async fn latest_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SuggestionRecord>, StoreError>;
}

/// Store used when persistence is disabled. Keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSuggestionStore;

#[async_trait]
impl SuggestionStore for NoopSuggestionStore {
    async fn store(
        &self,
        _user_id: &str,
        _result: &SuggestionResult,
    ) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn update_status(
        &self,
        _user_id: &str,
        _suggestion_id: &str,
        _status: SuggestionStatus,
        _completed: bool,
    ) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn get(
        &self,
        _user_id: &str,
        _suggestion_id: &str,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        Ok(None)
    }

    async fn list_recent(
        &self,
        _user_id: &str,
        _limit: u32,
    ) -> Result<Vec<SuggestionRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn latest_since(
        &self,
        _user_id: &str,
        _since: DateTime<Utc>,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        Ok(None)
    }
}
