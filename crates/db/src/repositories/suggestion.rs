use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use microhabit_core::habits::{
    MoodCategory, StoreError, SuggestionRecord, SuggestionResult, SuggestionStatus,
    SuggestionStore,
};

use super::RepositoryError;
use crate::DbPool;

const SELECT_COLUMNS: &str = "SELECT id, user_id, suggested_habit, mood, mood_category,
        screen_time_minutes, preferences_json, reasoning, generated_at, created_at,
        status, completed_at
     FROM habit_suggestion";

pub struct SqlSuggestionStore {
    pool: DbPool,
}

impl SqlSuggestionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        user_id: &str,
        result: &SuggestionResult,
    ) -> Result<String, RepositoryError> {
        let id = uuid::Uuid::new_v4().to_string();
        let preferences_json = serde_json::to_string(&result.preferences)
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO habit_suggestion
                (id, user_id, suggested_habit, mood, mood_category, screen_time_minutes,
                 preferences_json, reasoning, generated_at, created_at, status, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending', NULL)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&result.suggested_habit)
        .bind(&result.mood)
        .bind(result.mood_category.map(MoodCategory::key))
        .bind(result.screen_time_minutes)
        .bind(preferences_json)
        .bind(&result.reasoning)
        .bind(timestamp(result.generated_at))
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn set_status(
        &self,
        user_id: &str,
        suggestion_id: &str,
        status: SuggestionStatus,
        completed: bool,
    ) -> Result<bool, RepositoryError> {
        let completed_at = completed.then(|| timestamp(Utc::now()));
        let outcome = sqlx::query(
            "UPDATE habit_suggestion
             SET status = ?, completed_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(status.as_str())
        .bind(completed_at)
        .bind(suggestion_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(outcome.rows_affected() > 0)
    }

    async fn find(
        &self,
        user_id: &str,
        suggestion_id: &str,
    ) -> Result<Option<SuggestionRecord>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ? AND user_id = ?"))
            .bind(suggestion_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn recent(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<SuggestionRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect::<Result<Vec<_>, _>>()
    }

    async fn latest(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SuggestionRecord>, RepositoryError> {
        let row = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ? AND created_at >= ?
             ORDER BY created_at DESC, rowid DESC LIMIT 1"
        ))
        .bind(user_id)
        .bind(timestamp(since))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_record).transpose()
    }
}

#[async_trait]
impl SuggestionStore for SqlSuggestionStore {
    async fn store(
        &self,
        user_id: &str,
        result: &SuggestionResult,
    ) -> Result<Option<String>, StoreError> {
        Ok(Some(self.insert(user_id, result).await?))
    }

    async fn update_status(
        &self,
        user_id: &str,
        suggestion_id: &str,
        status: SuggestionStatus,
        completed: bool,
    ) -> Result<bool, StoreError> {
        Ok(self.set_status(user_id, suggestion_id, status, completed).await?)
    }

    async fn get(
        &self,
        user_id: &str,
        suggestion_id: &str,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        Ok(self.find(user_id, suggestion_id).await?)
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<SuggestionRecord>, StoreError> {
        Ok(self.recent(user_id, limit).await?)
    }

    async fn latest_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        Ok(self.latest(user_id, since).await?)
    }
}

/// Fixed-width UTC form so text ordering matches time ordering.
fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("{column}: {e}")))
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<SuggestionRecord, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let user_id: String =
        row.try_get("user_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let suggested_habit: String =
        row.try_get("suggested_habit").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let mood: String = row.try_get("mood").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let mood_category_str: Option<String> =
        row.try_get("mood_category").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let screen_time_minutes: f64 =
        row.try_get("screen_time_minutes").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let preferences_json: String =
        row.try_get("preferences_json").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let reasoning: String =
        row.try_get("reasoning").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let generated_at_str: String =
        row.try_get("generated_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let status_str: String =
        row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let completed_at_str: Option<String> =
        row.try_get("completed_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let mood_category = mood_category_str
        .map(|key| {
            MoodCategory::from_key(&key)
                .ok_or_else(|| RepositoryError::Decode(format!("unknown mood category `{key}`")))
        })
        .transpose()?;
    let preferences: Vec<String> = serde_json::from_str(&preferences_json)
        .map_err(|e| RepositoryError::Decode(format!("preferences_json: {e}")))?;
    let status = status_str.parse::<SuggestionStatus>().map_err(RepositoryError::Decode)?;
    let completed_at = completed_at_str
        .map(|value| parse_timestamp("completed_at", &value))
        .transpose()?;

    Ok(SuggestionRecord {
        id,
        user_id,
        suggestion: SuggestionResult {
            suggested_habit,
            mood,
            mood_category,
            screen_time_minutes,
            preferences,
            generated_at: parse_timestamp("generated_at", &generated_at_str)?,
            reasoning,
        },
        created_at: parse_timestamp("created_at", &created_at_str)?,
        status,
        completed_at,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use microhabit_core::habits::{
        RecommendationEngine, StoreError, SuggestionStatus, SuggestionStore,
    };

    use super::SqlSuggestionStore;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn suggestion(mood: &str, preferences: &[&str]) -> microhabit_core::SuggestionResult {
        let preferences: Vec<String> = preferences.iter().map(|p| p.to_string()).collect();
        RecommendationEngine::default().recommend(mood, 150.0, &preferences).expect("valid")
    }

    #[tokio::test]
    async fn store_and_get_round_trip() {
        let store = SqlSuggestionStore::new(setup().await);
        let result = suggestion("Stressed", &["Relaxation", "mindfulness"]);

        let id = store.store("u-1", &result).await.expect("store").expect("sql store assigns ids");
        let record = store.get("u-1", &id).await.expect("get").expect("record exists");

        assert_eq!(record.id, id);
        assert_eq!(record.user_id, "u-1");
        assert_eq!(record.status, SuggestionStatus::Pending);
        assert_eq!(record.completed_at, None);
        assert_eq!(record.suggestion.suggested_habit, result.suggested_habit);
        assert_eq!(record.suggestion.preferences, result.preferences);
        assert_eq!(record.suggestion.mood_category, result.mood_category);
        assert_eq!(record.suggestion.reasoning, result.reasoning);
    }

    #[tokio::test]
    async fn get_is_scoped_to_the_owner() {
        let store = SqlSuggestionStore::new(setup().await);
        let id = store.store("owner", &suggestion("happy", &[])).await.expect("store").expect("id");

        assert!(store.get("intruder", &id).await.expect("get").is_none());
        let updated = store
            .update_status("intruder", &id, SuggestionStatus::Completed, true)
            .await
            .expect("update");
        assert!(!updated);
    }

    #[tokio::test]
    async fn update_status_sets_and_clears_completion() {
        let store = SqlSuggestionStore::new(setup().await);
        let id = store.store("u-1", &suggestion("tired", &[])).await.expect("store").expect("id");

        assert!(store
            .update_status("u-1", &id, SuggestionStatus::Completed, true)
            .await
            .expect("complete"));
        let record = store.get("u-1", &id).await.expect("get").expect("record");
        assert_eq!(record.status, SuggestionStatus::Completed);
        assert!(record.completed_at.is_some());

        assert!(store
            .update_status("u-1", &id, SuggestionStatus::Skipped, false)
            .await
            .expect("skip"));
        let record = store.get("u-1", &id).await.expect("get").expect("record");
        assert_eq!(record.status, SuggestionStatus::Skipped);
        assert_eq!(record.completed_at, None);

        assert!(!store
            .update_status("u-1", "missing", SuggestionStatus::Skipped, false)
            .await
            .expect("missing"));
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let store = SqlSuggestionStore::new(setup().await);
        let mut ids = Vec::new();
        for mood in ["sad", "bored", "angry"] {
            ids.push(store.store("u-1", &suggestion(mood, &[])).await.expect("store").expect("id"));
        }
        store.store("u-2", &suggestion("happy", &[])).await.expect("store");

        let records = store.list_recent("u-1", 2).await.expect("list");
        let listed: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str()]);

        let all = store.list_recent("u-1", 10).await.expect("list");
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|record| record.user_id == "u-1"));
    }

    #[tokio::test]
    async fn latest_since_respects_the_cutoff() {
        let store = SqlSuggestionStore::new(setup().await);
        let id = store.store("u-1", &suggestion("excited", &[])).await.expect("store").expect("id");

        let found = store
            .latest_since("u-1", Utc::now() - Duration::hours(1))
            .await
            .expect("latest")
            .expect("stored within the hour");
        assert_eq!(found.id, id);

        let none =
            store.latest_since("u-1", Utc::now() + Duration::hours(1)).await.expect("latest");
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn closed_pool_surfaces_backend_error() {
        let pool = setup().await;
        let store = SqlSuggestionStore::new(pool.clone());
        pool.close().await;

        let error = store.list_recent("u-1", 5).await.expect_err("pool is closed");
        assert!(matches!(error, StoreError::Backend(_)));
    }
}
