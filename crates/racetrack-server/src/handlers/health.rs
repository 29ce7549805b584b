use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

/// # GET /api/health
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.db.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
