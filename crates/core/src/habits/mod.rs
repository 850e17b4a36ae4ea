//! Micro-habit recommendation: static catalog, weighting rules, selection
//! and the service wrapping them with optional persistence.

pub mod catalog;
pub mod engine;
pub mod reasoning;
pub mod selector;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;
pub mod weighting;

pub use catalog::{Category, HabitCatalog, HabitGroup, MoodCategory, BUILTIN_CATALOG, VALID_MOODS};
pub use engine::RecommendationEngine;
pub use reasoning::generate_reasoning;
pub use selector::{select_habit, Selection, FALLBACK_HABIT};
pub use service::RecommendationService;
pub use store::{NoopSuggestionStore, StoreError, SuggestionStore};
pub use types::{Recommendation, SuggestionRecord, SuggestionResult, SuggestionStatus};
pub use validation::{classify_mood, normalize_preference, normalize_preferences, validate};
pub use weighting::{apply_mood_and_preferences, apply_screen_time, ScreenTimeTier, WeightedPool};
