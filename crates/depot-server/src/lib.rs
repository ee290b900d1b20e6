pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Movements
        .route("/api/movements", get(routes::movements::get_movements))
        .route(
            "/api/movements/refresh",
            post(routes::movements::refresh_movements),
        )
        .route(
            "/api/movements/filters/reset",
            post(routes::movements::reset_filters),
        )
        .route(
            "/api/movements/columns/{column}/toggle",
            post(routes::movements::toggle_column),
        )
        .route(
            "/api/movements/sort/{column}",
            post(routes::movements::sort_by),
        )
        .route(
            "/api/movements/{id}/complete",
            post(routes::movements::complete_movement),
        )
        .route(
            "/api/movements/{id}/decline",
            post(routes::movements::decline_movement),
        )
        // Notices
        .route("/api/notices", get(routes::notices::drain_notices))
        // Equipment
        .route(
            "/api/equipment",
            get(routes::equipment::list_equipment).post(routes::equipment::create_equipment),
        )
        // Suppliers
        .route(
            "/api/suppliers",
            get(routes::suppliers::list_suppliers).post(routes::suppliers::create_supplier),
        )
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(cors)
        .with_state(app_state)
}

/// Start the dashboard server on `port`.
pub async fn serve(app_state: state::AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Start the dashboard server on a pre-bound listener.
///
/// Lets the caller read the actual port first when binding to port 0.
pub async fn serve_on(
    app_state: state::AppState,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state);

    tracing::info!("depot dashboard listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
