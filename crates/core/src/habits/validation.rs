//! Input validation, preference normalization and mood classification.

use super::catalog::{Category, MoodCategory, VALID_MOODS};
use crate::errors::DomainError;

/// Request fields after validation, resolved against the static tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub mood_category: Option<MoodCategory>,
    pub preferences: Vec<Category>,
}

/// Maps a preference in any case to its canonical key.
///
/// Display names are tried first, then canonical keys. Anything else is
/// returned unchanged so validation can name the offending entry.
pub fn normalize_preference(preference: &str) -> String {
    let lowered = preference.to_lowercase();

    if let Some(category) =
        Category::ALL.into_iter().find(|category| category.display_name().to_lowercase() == lowered)
    {
        return category.key().to_owned();
    }

    if let Some(category) = Category::from_key(&lowered) {
        return category.key().to_owned();
    }

    preference.to_owned()
}

pub fn normalize_preferences(preferences: &[String]) -> Vec<String> {
    preferences.iter().map(|preference| normalize_preference(preference)).collect()
}

pub fn classify_mood(mood: &str) -> Option<MoodCategory> {
    let lowered = mood.to_lowercase();
    MoodCategory::ALL.into_iter().find(|group| group.moods().contains(&lowered.as_str()))
}

pub fn validate_mood(mood: &str) -> Result<(), DomainError> {
    let lowered = mood.to_lowercase();
    if VALID_MOODS.contains(&lowered.as_str()) {
        Ok(())
    } else {
        Err(DomainError::InvalidMood { mood: mood.to_owned(), valid: VALID_MOODS.join(", ") })
    }
}

pub fn validate_screen_time(minutes: f64) -> Result<(), DomainError> {
    if minutes.is_finite() && minutes >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidScreenTime { value: minutes.to_string() })
    }
}

/// Resolves every preference to a category, failing on the first that does not resolve.
pub fn resolve_preferences(preferences: &[String]) -> Result<Vec<Category>, DomainError> {
    preferences
        .iter()
        .map(|preference| {
            let normalized = normalize_preference(preference);
            Category::from_key(&normalized).ok_or_else(|| DomainError::InvalidPreference {
                preference: normalized,
                valid: valid_preference_keys().join(", "),
            })
        })
        .collect()
}

/// Checks mood, screen time and preferences in that order.
pub fn validate(
    mood: &str,
    screen_time_minutes: f64,
    preferences: &[String],
) -> Result<ValidatedInput, DomainError> {
    validate_mood(mood)?;
    validate_screen_time(screen_time_minutes)?;
    let preferences = resolve_preferences(preferences)?;

    Ok(ValidatedInput { mood_category: classify_mood(mood), preferences })
}

fn valid_preference_keys() -> Vec<&'static str> {
    Category::ALL.iter().map(|category| category.key()).collect()
}
