use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::agent::ask_agent;
use crate::backend_client::{ChatRequest, ChatResponse};
use crate::error::AppError;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn reject(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(json!({ "detail": detail.into() })))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!("Received request for model: {}", request.model_name);

    if !state.settings.is_model_allowed(&request.model_name) {
        warn!("Invalid model name: {}", request.model_name);
        return Err(reject(StatusCode::BAD_REQUEST, "Invalid model name"));
    }

    if request.messages.iter().all(|m| m.trim().is_empty()) {
        return Err(reject(StatusCode::BAD_REQUEST, "messages must not be empty"));
    }

    match ask_agent(
        state.components.as_ref(),
        &request.model_name,
        &request.messages,
        request.allow_search,
        &request.system_prompt,
    )
    .await
    {
        Ok(response) => {
            info!("Successfully got response from AI agent {}", request.model_name);
            Ok(Json(ChatResponse { response }))
        }
        Err(e) => {
            let err = AppError::agent("Failed to get AI response", e);
            error!("{}", err);
            Err(reject(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "models": state.settings.allowed_model_names,
    }))
}
