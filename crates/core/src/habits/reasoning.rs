//! Human-readable justification for a suggestion.

use super::catalog::{Category, MoodCategory};
use super::weighting::ScreenTimeTier;

fn mood_sentence(mood: &str, mood_category: MoodCategory) -> String {
    let tail = match mood_category {
        MoodCategory::StressedAnxious => {
            "activities that promote relaxation and mindfulness can help reduce stress."
        }
        MoodCategory::TiredFatigued => {
            "light physical activity can actually boost your energy levels."
        }
        MoodCategory::HappyExcited => {
            "channeling that positive energy into productive or creative tasks can be fulfilling."
        }
        MoodCategory::Understimulated => {
            "engaging in stimulating activities can help increase your motivation."
        }
        MoodCategory::Negative => {
            "mindful activities and social connection can help improve your mood."
        }
    };
    format!("When you're feeling {mood}, {tail}")
}

fn screen_time_sentence(screen_time_minutes: f64) -> Option<&'static str> {
    match ScreenTimeTier::from_minutes(screen_time_minutes) {
        ScreenTimeTier::High => Some(
            "Your screen time is quite high today, so taking a break from devices could be beneficial.",
        ),
        ScreenTimeTier::Moderate => Some(
            "You've had a moderate amount of screen time today, so a short break might be refreshing.",
        ),
        ScreenTimeTier::Low => None,
    }
}

fn preference_sentence(preferences: &[Category]) -> Option<String> {
    if preferences.is_empty() {
        return None;
    }
    let names: Vec<&str> = preferences.iter().map(|category| category.display_name()).collect();
    Some(format!("This suggestion aligns with your preference for {}.", names.join(" and ")))
}

/// Builds the explanation from mood, screen time and preferences, skipping absent clauses.
///
/// `mood` is echoed as the user typed it.
pub fn generate_reasoning(
    mood: &str,
    mood_category: Option<MoodCategory>,
    screen_time_minutes: f64,
    preferences: &[Category],
) -> String {
    let mut reasons = Vec::with_capacity(3);

    if let Some(category) = mood_category {
        reasons.push(mood_sentence(mood, category));
    }
    if let Some(sentence) = screen_time_sentence(screen_time_minutes) {
        reasons.push(sentence.to_owned());
    }
    if let Some(sentence) = preference_sentence(preferences) {
        reasons.push(sentence);
    }

    reasons.join(" ")
}
