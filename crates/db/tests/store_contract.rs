use std::sync::Arc;

use microhabit_core::habits::{
    RecommendationEngine, RecommendationService, SuggestionStatus, SuggestionStore,
};
use microhabit_core::{ApplicationError, DomainError};
use microhabit_db::{
    connect_with_settings, migrations, InMemorySuggestionStore, SqlSuggestionStore,
};

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

async fn sql_store() -> ContractResult<Arc<dyn SuggestionStore>> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|err| format!("connect failed: {err}"))?;
    migrations::run_pending(&pool).await.map_err(|err| format!("migrations failed: {err}"))?;
    Ok(Arc::new(SqlSuggestionStore::new(pool)))
}

fn memory_store() -> Arc<dyn SuggestionStore> {
    Arc::new(InMemorySuggestionStore::default())
}

/// Behaviour every store must share when driven through the service.
async fn exercise_history_contract(store: Arc<dyn SuggestionStore>) -> ContractResult {
    let service = RecommendationService::new(RecommendationEngine::default(), store);
    let preferences = vec!["Nature".to_string(), "social".to_string()];

    let mut ids = Vec::new();
    for mood in ["tired", "exhausted", "fatigued"] {
        let recommendation = service
            .recommend_for_user(Some("u-contract"), mood, 260.0, &preferences)
            .await
            .map_err(|err| format!("recommend failed: {err}"))?;
        require!(recommendation.persistence_warning.is_none(), "store should not warn");
        let id = recommendation
            .suggestion_id
            .ok_or_else(|| "store should assign an id".to_string())?;
        ids.push(id);
    }

    let recent = service
        .list_recent("u-contract", Some(2))
        .await
        .map_err(|err| format!("list failed: {err}"))?;
    require_eq!(recent.len(), 2);
    require_eq!(recent[0].id, ids[2]);
    require_eq!(recent[1].id, ids[1]);
    require!(
        recent.iter().all(|record| record.suggestion.preferences == preferences),
        "preferences should be stored as supplied"
    );

    let today =
        service.today("u-contract").await.map_err(|err| format!("today failed: {err}"))?;
    require_eq!(today.id, ids[2]);
    require_eq!(today.status, SuggestionStatus::Pending);

    service
        .update_status("u-contract", &ids[0], SuggestionStatus::Completed, true)
        .await
        .map_err(|err| format!("update failed: {err}"))?;
    let completed =
        service.get("u-contract", &ids[0]).await.map_err(|err| format!("get failed: {err}"))?;
    require_eq!(completed.status, SuggestionStatus::Completed);
    require!(completed.completed_at.is_some(), "completion should be timestamped");

    let missing =
        service.update_status("u-contract", "missing", SuggestionStatus::Skipped, false).await;
    require!(
        matches!(missing, Err(ApplicationError::Domain(DomainError::SuggestionNotFound { .. }))),
        "unknown suggestion should be not found, got {missing:?}"
    );

    let foreign = service.get("someone-else", &ids[1]).await;
    require!(
        matches!(foreign, Err(ApplicationError::Domain(DomainError::SuggestionNotFound { .. }))),
        "suggestions should be scoped to their owner"
    );

    Ok(())
}

#[tokio::test]
async fn sql_store_honours_history_contract() -> ContractResult {
    exercise_history_contract(sql_store().await?).await
}

#[tokio::test]
async fn in_memory_store_honours_history_contract() -> ContractResult {
    exercise_history_contract(memory_store()).await
}
