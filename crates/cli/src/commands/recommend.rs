use std::sync::Arc;

use clap::Args;
use microhabit_core::config::{AppConfig, LoadOptions};
use microhabit_core::habits::{
    Recommendation, RecommendationEngine, RecommendationService, SuggestionResult,
};
use microhabit_db::SqlSuggestionStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::commands::{open_migrated_pool, CommandResult, EXIT_INVALID_INPUT};

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Current mood, e.g. stressed or happy")]
    pub mood: String,
    #[arg(long = "screen-time", allow_negative_numbers = true, help = "Screen time in minutes")]
    pub screen_time: f64,
    #[arg(long = "preference", help = "Preferred category; repeat for several")]
    pub preferences: Vec<String>,
    #[arg(long, help = "Seed for a repeatable pick")]
    pub seed: Option<u64>,
    #[arg(long, help = "Store the suggestion in this user's history")]
    pub user: Option<String>,
}

pub fn run(args: &RecommendArgs) -> CommandResult {
    let engine = RecommendationEngine::default();
    let computed = match args.seed {
        Some(seed) => engine.recommend_with_rng(
            &args.mood,
            args.screen_time,
            &args.preferences,
            &mut StdRng::seed_from_u64(seed),
        ),
        None => engine.recommend(&args.mood, args.screen_time, &args.preferences),
    };
    let suggestion = match computed {
        Ok(suggestion) => suggestion,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "invalid_input",
                error.to_string(),
                EXIT_INVALID_INPUT,
            );
        }
    };

    // Anonymous requests never touch configuration or the database.
    let recommendation = match args.user.as_deref().filter(|user| !user.trim().is_empty()) {
        Some(user) => save(engine, user, suggestion),
        None => Recommendation { suggestion, suggestion_id: None, persistence_warning: None },
    };

    let message = match &recommendation.persistence_warning {
        Some(warning) => format!("{} ({warning})", recommendation.suggestion.suggested_habit),
        None => recommendation.suggestion.suggested_habit.clone(),
    };
    let data = serde_json::to_value(&recommendation).ok();
    CommandResult::success_with_data("recommend", message, data)
}

/// Stores the suggestion; any failure on the way is reported as a warning.
fn save(engine: RecommendationEngine, user: &str, suggestion: SuggestionResult) -> Recommendation {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return unsaved(suggestion, format!("configuration issue: {error}")),
    };
    if !config.storage.enabled {
        return Recommendation { suggestion, suggestion_id: None, persistence_warning: None };
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return unsaved(suggestion, format!("failed to initialize async runtime: {error}"))
        }
    };

    runtime.block_on(async {
        let pool = match open_migrated_pool(&config).await {
            Ok(pool) => pool,
            Err((_, message, _)) => return unsaved(suggestion, message),
        };
        let store = Arc::new(SqlSuggestionStore::new(pool.clone()));
        let recommendation =
            RecommendationService::new(engine, store).persist(Some(user), suggestion).await;
        pool.close().await;
        recommendation
    })
}

fn unsaved(suggestion: SuggestionResult, reason: String) -> Recommendation {
    Recommendation {
        suggestion,
        suggestion_id: None,
        persistence_warning: Some(format!("suggestion was not saved: {reason}")),
    }
}
