use std::sync::Arc;

use microhabit_core::habits::{RecommendationEngine, RecommendationService};
use microhabit_db::SqlSuggestionStore;
use serde_json::json;

use crate::commands::{
    build_runtime, load_config, open_migrated_pool, CommandResult, EXIT_CONFIG, EXIT_PERSISTENCE,
};

pub fn run(user: &str, limit: Option<u32>) -> CommandResult {
    let config = match load_config("history") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    if !config.storage.enabled {
        return CommandResult::failure(
            "history",
            "storage_disabled",
            "suggestion storage is disabled (set MICROHABIT_STORAGE_ENABLED=true)",
            EXIT_CONFIG,
        );
    }

    let runtime = match build_runtime("history") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated_pool(&config).await?;
        let store = Arc::new(SqlSuggestionStore::new(pool.clone()));
        let service = RecommendationService::new(RecommendationEngine::default(), store)
            .with_history(config.history);

        let records = service
            .list_recent(user, limit)
            .await
            .map_err(|error| ("persistence", error.to_string(), EXIT_PERSISTENCE));
        pool.close().await;
        records
    });

    match result {
        Ok(records) => CommandResult::success_with_data(
            "history",
            format!("{} suggestion(s) for `{user}`", records.len()),
            Some(json!({ "suggestions": records })),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("history", error_class, message, exit_code)
        }
    }
}
