use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use depot_core::inventory::NewEquipment;
use depot_core::screen::NoticeLevel;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/equipment: list registered equipment.
pub async fn list_equipment(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let items = app.backend.list_equipment()?;
        Ok::<_, anyhow::Error>(serde_json::to_value(items)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/equipment: validate and register a piece of equipment.
pub async fn create_equipment(
    State(app): State<AppState>,
    Json(body): Json<NewEquipment>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let form = body.validate()?;
    let result = tokio::task::spawn_blocking(move || {
        let created = app.backend.create_equipment(&form)?;
        app.lock_screen()?.notify(
            NoticeLevel::Success,
            format!("Equipment {} registered", created.serial_number),
        );
        Ok::<_, anyhow::Error>(serde_json::to_value(created)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((StatusCode::CREATED, Json(result)))
}
