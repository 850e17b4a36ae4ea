//! Recommendation service: the engine plus best-effort persistence and
//! per-user suggestion history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, warn};

use super::engine::RecommendationEngine;
use super::store::{NoopSuggestionStore, StoreError, SuggestionStore};
use super::types::{Recommendation, SuggestionRecord, SuggestionResult, SuggestionStatus};
use crate::config::HistoryConfig;
use crate::errors::{ApplicationError, DomainError};

impl From<StoreError> for ApplicationError {
    fn from(error: StoreError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

#[derive(Clone)]
pub struct RecommendationService {
    engine: RecommendationEngine,
    store: Arc<dyn SuggestionStore>,
    history: HistoryConfig,
}

impl RecommendationService {
    pub fn new(engine: RecommendationEngine, store: Arc<dyn SuggestionStore>) -> Self {
        Self { engine, store, history: HistoryConfig::default() }
    }

    /// Service that computes suggestions but never stores them.
    pub fn without_storage(engine: RecommendationEngine) -> Self {
        Self::new(engine, Arc::new(NoopSuggestionStore))
    }

    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn history(&self) -> HistoryConfig {
        self.history
    }

    /// Computes a suggestion and, when a user is given, stores it.
    ///
    /// A store failure does not fail the call: the suggestion is returned
    /// without an id and with `persistence_warning` set.
    pub async fn recommend_for_user(
        &self,
        user_id: Option<&str>,
        mood: &str,
        screen_time_minutes: f64,
        preferences: &[String],
    ) -> Result<Recommendation, DomainError> {
        let suggestion = self.engine.recommend(mood, screen_time_minutes, preferences)?;
        Ok(self.persist(user_id, suggestion).await)
    }

    /// Like [`recommend_for_user`](Self::recommend_for_user) with a caller-supplied random source.
    pub async fn recommend_for_user_with_rng<R: Rng + ?Sized>(
        &self,
        user_id: Option<&str>,
        mood: &str,
        screen_time_minutes: f64,
        preferences: &[String],
        rng: &mut R,
    ) -> Result<Recommendation, DomainError> {
        let suggestion =
            self.engine.recommend_with_rng(mood, screen_time_minutes, preferences, rng)?;
        Ok(self.persist(user_id, suggestion).await)
    }

    /// Stores an already computed suggestion for `user_id`, if one is given.
    pub async fn persist(
        &self,
        user_id: Option<&str>,
        suggestion: SuggestionResult,
    ) -> Recommendation {
        let Some(user_id) = user_id.filter(|id| !id.trim().is_empty()) else {
            return Recommendation { suggestion, suggestion_id: None, persistence_warning: None };
        };

        match self.store.store(user_id, &suggestion).await {
            Ok(suggestion_id) => {
                info!(
                    event_name = "habits.service.suggestion_stored",
                    user_id,
                    suggestion_id = suggestion_id.as_deref(),
                    "suggestion stored"
                );
                Recommendation { suggestion, suggestion_id, persistence_warning: None }
            }
            Err(error) => {
                warn!(
                    event_name = "habits.service.store_failed",
                    user_id,
                    error = %error,
                    "suggestion could not be stored; returning it unsaved"
                );
                Recommendation {
                    suggestion,
                    suggestion_id: None,
                    persistence_warning: Some(format!("suggestion was not saved: {error}")),
                }
            }
        }
    }

    pub async fn update_status(
        &self,
        user_id: &str,
        suggestion_id: &str,
        status: SuggestionStatus,
        completed: bool,
    ) -> Result<(), ApplicationError> {
        let updated = self.store.update_status(user_id, suggestion_id, status, completed).await?;
        if !updated {
            return Err(DomainError::SuggestionNotFound { id: suggestion_id.to_owned() }.into());
        }

        info!(
            event_name = "habits.service.status_updated",
            user_id,
            suggestion_id,
            status = status.as_str(),
            completed,
            "suggestion status updated"
        );
        Ok(())
    }

    pub async fn get(
        &self,
        user_id: &str,
        suggestion_id: &str,
    ) -> Result<SuggestionRecord, ApplicationError> {
        self.store
            .get(user_id, suggestion_id)
            .await?
            .ok_or_else(|| DomainError::SuggestionNotFound { id: suggestion_id.to_owned() }.into())
    }

    /// Newest first, with `limit` resolved against the history bounds.
    pub async fn list_recent(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<SuggestionRecord>, ApplicationError> {
        let limit = self.history.clamp(limit);
        Ok(self.store.list_recent(user_id, limit).await?)
    }

    /// Most recent suggestion created today (UTC).
    pub async fn today(&self, user_id: &str) -> Result<SuggestionRecord, ApplicationError> {
        self.today_at(user_id, Utc::now()).await
    }

    pub async fn today_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SuggestionRecord, ApplicationError> {
        let since = start_of_day(now);
        self.store.latest_since(user_id, since).await?.ok_or_else(|| {
            DomainError::SuggestionNotFound { id: format!("today for user `{user_id}`") }.into()
        })
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc()
}
