use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use depot_core::filter::parse_date_filter;
use depot_core::mutator::TransitionRequest;
use depot_core::screen::TransitionOutcome;
use depot_core::table::MovementColumn;
use depot_core::types::{ActionKind, TypeFilter};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct MovementsQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub movement_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// GET /api/movements: apply any filters in the query and return the screen.
///
/// Filter values are all checked before any is applied, so a rejected query
/// leaves the screen's filters as they were.
/// The collection is fetched on the first request. A failed fetch is reported
/// inline in `fetch_error` rather than as an HTTP error.
pub async fn get_movements(
    State(app): State<AppState>,
    Query(query): Query<MovementsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let movement_type = query
        .movement_type
        .as_deref()
        .map(str::parse::<TypeFilter>)
        .transpose()?;
    let date = query.date.as_deref().map(parse_date_filter).transpose()?;

    let result = tokio::task::spawn_blocking(move || {
        let ticket = {
            let mut screen = app.lock_screen()?;
            let mut filter = screen.view().filter().clone();
            if let Some(search) = query.search {
                filter.search = search;
            }
            if let Some(movement_type) = movement_type {
                filter.movement_type = movement_type;
            }
            if let Some(date) = date {
                filter.date = date;
            }
            screen.view_mut().set_filter(filter);
            if !screen.is_loaded() && !screen.view().is_loading() && screen.fetch_error().is_none()
            {
                Some(screen.begin_load())
            } else {
                None
            }
        };

        if let Some(ticket) = ticket {
            let fetched = app.backend.list_movements();
            let mut screen = app.lock_screen()?;
            // The failure is already on the snapshot as `fetch_error`.
            let _ = screen.finish_load(ticket, fetched);
        }

        let mut screen = app.lock_screen()?;
        Ok::<_, anyhow::Error>(serde_json::to_value(screen.snapshot())?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/movements/refresh: re-fetch the collection from the backend.
pub async fn refresh_movements(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let ticket = app.lock_screen()?.begin_load();
        let fetched = app.backend.list_movements();
        let mut screen = app.lock_screen()?;
        screen.finish_load(ticket, fetched)?;
        Ok::<_, anyhow::Error>(serde_json::to_value(screen.snapshot())?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/movements/filters/reset: clear search, type and date.
pub async fn reset_filters(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut screen = app.lock_screen()?;
    screen.view_mut().reset_filters();
    Ok(Json(serde_json::to_value(screen.snapshot())?))
}

/// POST /api/movements/columns/:column/toggle: show or hide one column.
pub async fn toggle_column(
    State(app): State<AppState>,
    Path(column): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut screen = app.lock_screen()?;
    let visible = screen.view_mut().toggle_column_key(&column)?;
    Ok(Json(serde_json::json!({
        "column": column,
        "visible": visible,
    })))
}

/// POST /api/movements/sort/:column: sort by a column, flipping on repeat.
pub async fn sort_by(
    State(app): State<AppState>,
    Path(column): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let column: MovementColumn = column.parse()?;
    let mut screen = app.lock_screen()?;
    let sort = screen.view_mut().sort_by(column)?;
    Ok(Json(serde_json::to_value(sort)?))
}

/// POST /api/movements/:id/complete: mark a pending request completed.
pub async fn complete_movement(
    State(app): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    transition(app, id, ActionKind::Complete).await
}

/// POST /api/movements/:id/decline: decline a pending request.
pub async fn decline_movement(
    State(app): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    transition(app, id, ActionKind::Decline).await
}

async fn transition(
    app: AppState,
    id: u64,
    action: ActionKind,
) -> Result<Json<serde_json::Value>, AppError> {
    let policy = app.config.dashboard.movement_date_on_transition;
    let request = TransitionRequest::from_action(id, action);
    let result = tokio::task::spawn_blocking(move || {
        let pending = app
            .lock_screen()?
            .begin_transition(request, policy, Utc::now())?;

        let response = app.backend.update_movement_status(id, &pending.payload);

        let mut screen = app.lock_screen()?;
        let outcome = match response {
            Ok(updated) => screen.complete_transition(pending, updated)?,
            Err(e) => return Err(screen.fail_transition(pending, e).into()),
        };
        let json = match outcome {
            TransitionOutcome::Applied(movement) => serde_json::json!({
                "id": id,
                "action": action,
                "outcome": "applied",
                "movement": movement,
            }),
            TransitionOutcome::Stale => serde_json::json!({
                "id": id,
                "action": action,
                "outcome": "stale",
            }),
        };
        Ok::<_, anyhow::Error>(json)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
