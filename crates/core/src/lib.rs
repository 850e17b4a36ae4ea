pub mod config;
pub mod errors;
pub mod habits;

pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use habits::{
    Category, HabitCatalog, MoodCategory, NoopSuggestionStore, Recommendation,
    RecommendationEngine, RecommendationService, StoreError, SuggestionRecord, SuggestionResult,
    SuggestionStatus, SuggestionStore, BUILTIN_CATALOG, VALID_MOODS,
};
