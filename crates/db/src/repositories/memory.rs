use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use microhabit_core::habits::{
    StoreError, SuggestionRecord, SuggestionResult, SuggestionStatus, SuggestionStore,
};

/// Process-local suggestion store keyed by user, each user's records in insertion order.
#[derive(Default)]
pub struct InMemorySuggestionStore {
    users: RwLock<HashMap<String, Vec<SuggestionRecord>>>,
}

#[async_trait::async_trait]
impl SuggestionStore for InMemorySuggestionStore {
    async fn store(
        &self,
        user_id: &str,
        result: &SuggestionResult,
    ) -> Result<Option<String>, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = SuggestionRecord::pending(id.clone(), user_id, result.clone(), Utc::now());

        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().push(record);
        Ok(Some(id))
    }

    async fn update_status(
        &self,
        user_id: &str,
        suggestion_id: &str,
        status: SuggestionStatus,
        completed: bool,
    ) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(user_id)
            .and_then(|records| records.iter_mut().find(|record| record.id == suggestion_id));

        match record {
            Some(record) => {
                record.transition(status, completed, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(
        &self,
        user_id: &str,
        suggestion_id: &str,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .and_then(|records| records.iter().find(|record| record.id == suggestion_id))
            .cloned())
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<SuggestionRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|records| records.iter().rev().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn latest_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .and_then(|records| records.iter().rev().find(|record| record.created_at >= since))
            .cloned())
    }
}
