//! Recommendation pipeline.
//!
//! `validate -> classify -> screen-time weighting -> mood/preference weighting
//! -> weighted draw -> reasoning`. The engine holds no mutable state and does
//! no I/O, so a single value is shared by every caller.

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use super::catalog::{Category, HabitCatalog, BUILTIN_CATALOG, VALID_MOODS};
use super::reasoning::generate_reasoning;
use super::selector::select_habit;
use super::types::SuggestionResult;
use super::validation::validate;
use super::weighting::{apply_mood_and_preferences, apply_screen_time};
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationEngine {
    catalog: HabitCatalog,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(BUILTIN_CATALOG)
    }
}

impl RecommendationEngine {
    pub const fn new(catalog: HabitCatalog) -> Self {
        Self { catalog }
    }

    /// Recommends a habit using the thread-local random generator.
    pub fn recommend(
        &self,
        mood: &str,
        screen_time_minutes: f64,
        preferences: &[String],
    ) -> Result<SuggestionResult, DomainError> {
        self.recommend_with_rng(mood, screen_time_minutes, preferences, &mut rand::thread_rng())
    }

    /// Same as [`recommend`](Self::recommend) with a caller-supplied random source.
    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        mood: &str,
        screen_time_minutes: f64,
        preferences: &[String],
        rng: &mut R,
    ) -> Result<SuggestionResult, DomainError> {
        let input = validate(mood, screen_time_minutes, preferences)?;

        let screen_weighted = apply_screen_time(self.catalog, screen_time_minutes);
        let pool =
            apply_mood_and_preferences(input.mood_category, &screen_weighted, &input.preferences);
        let selection = select_habit(&pool, rng);

        debug!(
            event_name = "habits.engine.selected",
            mood_category = input.mood_category.map(|category| category.key()),
            habit_category = selection.category.map(Category::key),
            pool_weight = pool.total_weight(),
            "habit selected"
        );

        Ok(SuggestionResult {
            suggested_habit: selection.habit.to_owned(),
            mood: mood.to_owned(),
            mood_category: input.mood_category,
            screen_time_minutes,
            preferences: preferences.to_vec(),
            generated_at: Utc::now(),
            reasoning: generate_reasoning(
                mood,
                input.mood_category,
                screen_time_minutes,
                &input.preferences,
            ),
        })
    }

    pub fn catalog(&self) -> HabitCatalog {
        self.catalog
    }

    pub fn valid_moods(&self) -> &'static [&'static str] {
        &VALID_MOODS
    }

    /// Display names of every preference category, in canonical order.
    pub fn preference_display_names(&self) -> Vec<&'static str> {
        Category::ALL.iter().map(|category| category.display_name()).collect()
    }

    pub fn preference_keys(&self) -> Vec<&'static str> {
        Category::ALL.iter().map(|category| category.key()).collect()
    }
}
