use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: the configuration this server runs with.
///
/// The API token is never echoed back; only whether one is set.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut config = (*app.config).clone();
    let has_token = config.api.token.take().is_some();
    let mut json = serde_json::to_value(&config)?;
    json["api"]["token_set"] = serde_json::Value::Bool(has_token);
    Ok(Json(json))
}
