use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/notices: hand out queued notices once and clear them.
pub async fn drain_notices(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let notices = app.lock_screen()?.drain_notices();
    Ok(Json(serde_json::to_value(notices)?))
}
