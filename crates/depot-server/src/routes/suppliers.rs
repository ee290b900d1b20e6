use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use depot_core::inventory::NewSupplier;
use depot_core::screen::NoticeLevel;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/suppliers: list suppliers.
pub async fn list_suppliers(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let items = app.backend.list_suppliers()?;
        Ok::<_, anyhow::Error>(serde_json::to_value(items)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/suppliers: validate and register a supplier.
pub async fn create_supplier(
    State(app): State<AppState>,
    Json(body): Json<NewSupplier>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let form = body.validate()?;
    let result = tokio::task::spawn_blocking(move || {
        let created = app.backend.create_supplier(&form)?;
        app.lock_screen()?.notify(
            NoticeLevel::Success,
            format!("Supplier {} registered", created.name),
        );
        Ok::<_, anyhow::Error>(serde_json::to_value(created)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((StatusCode::CREATED, Json(result)))
}
