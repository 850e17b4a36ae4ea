//! Types for the habit recommender

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::MoodCategory;

/// A single recommendation with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    /// Selected habit text
    pub suggested_habit: String,
    /// Mood exactly as supplied
    pub mood: String,
    /// `None` when the mood matched no group
    pub mood_category: Option<MoodCategory>,
    pub screen_time_minutes: f64,
    /// Preferences as supplied, before normalization
    pub preferences: Vec<String>,
    #[serde(rename = "timestamp")]
    pub generated_at: DateTime<Utc>,
    pub reasoning: String,
}

/// Lifecycle of a stored suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Pending,
    Completed,
    Skipped,
}

impl SuggestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Completed => "completed",
            SuggestionStatus::Skipped => "skipped",
        }
    }
}

impl std::str::FromStr for SuggestionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            other => {
                Err(format!("unsupported status `{other}` (expected pending|completed|skipped)"))
            }
        }
    }
}

/// A suggestion as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub suggestion: SuggestionResult,
    pub created_at: DateTime<Utc>,
    pub status: SuggestionStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SuggestionRecord {
    /// New pending record for a freshly generated suggestion.
    pub fn pending(
        id: impl Into<String>,
        user_id: impl Into<String>,
        suggestion: SuggestionResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            suggestion,
            created_at,
            status: SuggestionStatus::Pending,
            completed_at: None,
        }
    }

    /// Applies a status change; `completed` stamps `completed_at`, otherwise it is cleared.
    pub fn transition(&mut self, status: SuggestionStatus, completed: bool, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = completed.then_some(now);
    }
}

/// Outcome of a recommendation that may also have been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub suggestion: SuggestionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_id: Option<String>,
    /// Set when the suggestion could not be stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn sample() -> SuggestionResult {
        SuggestionResult {
            suggested_habit: "Water your plants".to_string(),
            mood: "Sad".to_string(),
            mood_category: Some(MoodCategory::Negative),
            screen_time_minutes: 120.0,
            preferences: vec![],
            generated_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).single().expect("valid"),
            reasoning: "When you're feeling Sad, ...".to_string(),
        }
    }

    #[test]
    fn wire_format_uses_suggested_habit_and_snake_case_category() {
        let value = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(value["suggested_habit"], json!("Water your plants"));
        assert_eq!(value["mood_category"], json!("negative"));
        assert_eq!(value["screen_time_minutes"], json!(120.0));
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn wire_format_round_trips() {
        let original = SuggestionResult {
            preferences: vec!["Relaxation".to_string(), "mindfulness".to_string()],
            screen_time_minutes: 310.0,
            ..sample()
        };
        let encoded = serde_json::to_string(&original).expect("serialize");
        let decoded: SuggestionResult = serde_json::from_str(&encoded).expect("deserialize");

        assert_eq!(decoded.mood, original.mood);
        assert_eq!(decoded.screen_time_minutes, original.screen_time_minutes);
        assert_eq!(decoded.preferences, original.preferences);
        assert_eq!(decoded.suggested_habit, original.suggested_habit);
    }

    #[test]
    fn transition_sets_and_clears_completion() {
        let now = Utc::now();
        let mut record = SuggestionRecord::pending("s-1", "u-1", sample(), now);
        assert_eq!(record.status, SuggestionStatus::Pending);

        record.transition(SuggestionStatus::Completed, true, now);
        assert_eq!(record.completed_at, Some(now));

        record.transition(SuggestionStatus::Skipped, false, now);
        assert_eq!(record.status, SuggestionStatus::Skipped);
        assert_eq!(record.completed_at, None);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Completed".parse::<SuggestionStatus>(), Ok(SuggestionStatus::Completed));
        assert!("done".parse::<SuggestionStatus>().is_err());
    }

    #[test]
    fn recommendation_omits_absent_persistence_fields() {
        let value = serde_json::to_value(Recommendation {
            suggestion: sample(),
            suggestion_id: None,
            persistence_warning: None,
        })
        .expect("serialize");

        assert!(value.get("suggestion_id").is_none());
        assert!(value.get("persistence_warning").is_none());
        assert_eq!(value["mood"], json!("Sad"));
    }
}
