//! HTTP surface for recommendations, catalog discovery and suggestion history.
//!
//! - `GET  /`                                          usage page
//! - `POST /recommend`                                 recommend a habit
//! - `GET  /moods`, `/preferences`, `/habits`          catalog discovery
//! - `GET  /users/{user_id}/suggestions?limit=`        recent suggestions
//! - `GET  /users/{user_id}/suggestions/today`         today's suggestion
//! - `GET  /users/{user_id}/suggestions/{id}`          one suggestion
//! - `PUT  /users/{user_id}/suggestions/{id}/status`   mark completed / skipped

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use microhabit_core::habits::{
    Recommendation, RecommendationService, SuggestionRecord, SuggestionStatus,
};
use microhabit_core::{ApplicationError, DomainError, InterfaceError};

#[derive(Clone)]
pub struct ApiState {
    service: RecommendationService,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// `POST /recommend` body after field checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub mood: String,
    pub screen_time_minutes: f64,
    pub preferences: Vec<String>,
    pub user_id: Option<String>,
}

const REQUIRED_FIELDS: [&str; 3] = ["mood", "screen_time_minutes", "preferences"];

impl RecommendRequest {
    /// Checks presence and JSON types; value validation is left to the engine.
    pub fn from_json(body: &Value) -> Result<Self, String> {
        let object =
            body.as_object().ok_or_else(|| "Request body must be a JSON object".to_string())?;

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !object.contains_key(**field)) {
            return Err(format!("Missing required field: {missing}"));
        }

        let mood = object["mood"].as_str().ok_or_else(|| "mood must be a string".to_string())?;

        let screen_time = &object["screen_time_minutes"];
        let screen_time_minutes = match screen_time {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            DomainError::InvalidScreenTime { value: screen_time.to_string() }.to_string()
        })?;

        let preferences = object["preferences"]
            .as_array()
            .and_then(|values| {
                values.iter().map(|value| value.as_str().map(str::to_owned)).collect::<Option<_>>()
            })
            .ok_or_else(|| "preferences must be a list of strings".to_string())?;

        let user_id = match object.get("user_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => return Err("user_id must be a string".to_string()),
        };

        Ok(Self { mood: mood.to_owned(), screen_time_minutes, preferences, user_id })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub suggestion_id: String,
    pub status: SuggestionStatus,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct SuggestionList {
    pub suggestions: Vec<SuggestionRecord>,
}

#[derive(Debug, Serialize)]
pub struct MoodList {
    pub moods: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct PreferenceList {
    pub preferences: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HabitListing {
    pub habits: BTreeMap<&'static str, Vec<&'static str>>,
}

pub fn router(service: RecommendationService) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/recommend", post(recommend))
        .route("/moods", get(moods))
        .route("/preferences", get(preferences))
        .route("/habits", get(habits))
        .route("/users/{user_id}/suggestions", get(list_suggestions))
        .route("/users/{user_id}/suggestions/today", get(todays_suggestion))
        .route("/users/{user_id}/suggestions/{suggestion_id}", get(get_suggestion))
        .route("/users/{user_id}/suggestions/{suggestion_id}/status", put(update_status))
        .with_state(ApiState { service })
}

pub async fn home() -> Html<&'static str> {
    Html(
        r#"<h1>Micro-Habits Tracker API</h1>
<p>Use the /recommend endpoint with a POST request containing:</p>
<pre>
{
    "mood": "Stressed",
    "screen_time_minutes": 310,
    "preferences": ["Relaxation", "Mindfulness"]
}
</pre>
<p>Add "user_id" to keep the suggestion in that user's history.</p>"#,
    )
}

pub async fn recommend(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Recommendation>, ApiError> {
    let Json(body) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let request = RecommendRequest::from_json(&body).map_err(bad_request)?;

    let recommendation = state
        .service
        .recommend_for_user(
            request.user_id.as_deref(),
            &request.mood,
            request.screen_time_minutes,
            &request.preferences,
        )
        .await
        .map_err(|error| bad_request(error.to_string()))?;

    info!(
        event_name = "api.recommend.completed",
        mood = %request.mood,
        suggestion_id = recommendation.suggestion_id.as_deref(),
        persisted = recommendation.persistence_warning.is_none(),
        "recommendation served"
    );
    Ok(Json(recommendation))
}

pub async fn moods(State(state): State<ApiState>) -> Json<MoodList> {
    Json(MoodList { moods: state.service.engine().valid_moods().to_vec() })
}

pub async fn preferences(State(state): State<ApiState>) -> Json<PreferenceList> {
    Json(PreferenceList { preferences: state.service.engine().preference_display_names() })
}

pub async fn habits(State(state): State<ApiState>) -> Json<HabitListing> {
    let habits = state
        .service
        .engine()
        .catalog()
        .groups()
        .iter()
        .map(|group| (group.category.key(), group.habits.to_vec()))
        .collect();
    Json(HabitListing { habits })
}

pub async fn list_suggestions(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<SuggestionList>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let suggestions = state
        .service
        .list_recent(&user_id, query.limit)
        .await
        .map_err(|error| application_error(error, correlation_id))?;
    Ok(Json(SuggestionList { suggestions }))
}

pub async fn todays_suggestion(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuggestionRecord>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let record = state
        .service
        .today(&user_id)
        .await
        .map_err(|error| application_error(error, correlation_id))?;
    Ok(Json(record))
}

pub async fn get_suggestion(
    State(state): State<ApiState>,
    Path((user_id, suggestion_id)): Path<(String, String)>,
) -> Result<Json<SuggestionRecord>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let record = state
        .service
        .get(&user_id, &suggestion_id)
        .await
        .map_err(|error| application_error(error, correlation_id))?;
    Ok(Json(record))
}

pub async fn update_status(
    State(state): State<ApiState>,
    Path((user_id, suggestion_id)): Path<(String, String)>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let status = request.status.parse::<SuggestionStatus>().map_err(bad_request)?;
    let completed = request.completed.unwrap_or(status == SuggestionStatus::Completed);

    let correlation_id = Uuid::new_v4().to_string();
    state
        .service
        .update_status(&user_id, &suggestion_id, status, completed)
        .await
        .map_err(|error| application_error(error, correlation_id))?;

    Ok(Json(StatusUpdateResponse { suggestion_id, status, completed }))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message.into(), correlation_id: None }))
}

fn application_error(error: ApplicationError, correlation_id: String) -> ApiError {
    let interface = error.into_interface(correlation_id);
    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let error = match &interface {
        InterfaceError::BadRequest { message, .. } | InterfaceError::NotFound { message, .. } => {
            message.clone()
        }
        InterfaceError::ServiceUnavailable { message, .. } => {
            warn!(
                event_name = "api.history.unavailable",
                correlation_id = interface.correlation_id(),
                error = %message,
                "suggestion store unavailable"
            );
            interface.user_message().to_string()
        }
        InterfaceError::Internal { message, .. } => {
            error!(
                event_name = "api.history.internal_error",
                correlation_id = interface.correlation_id(),
                error = %message,
                "unexpected failure serving history request"
            );
            interface.user_message().to_string()
        }
    };

    let correlation_id = Some(interface.correlation_id().to_string());
    (status, Json(ErrorBody { error, correlation_id }))
}
