use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Routes of the command interface.
///
/// `max_body_bytes` caps drawing uploads and CSV imports; other routes keep
/// axum's default limit.
pub fn configure_routes(max_body_bytes: usize) -> Router {
    let upload_limit = DefaultBodyLimit::max(max_body_bytes);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Component handlers
        .route(
            "/api/component",
            get(handlers::a001_component::list).post(handlers::a001_component::create),
        )
        .route(
            "/api/component/export",
            get(handlers::a001_component::export_csv),
        )
        .route(
            "/api/component/:id",
            get(handlers::a001_component::get_by_id)
                .put(handlers::a001_component::update)
                .delete(handlers::a001_component::delete),
        )
        .route(
            "/api/component/:id/drawing",
            post(handlers::a001_component::upload_drawing).layer(upload_limit),
        )
        .route(
            "/api/component/:id/readings",
            get(handlers::a001_component::list_readings),
        )
        // A002 Reading handlers
        .route("/api/reading", post(handlers::a002_reading::create))
        .route(
            "/api/reading/:id",
            get(handlers::a002_reading::get_by_id)
                .put(handlers::a002_reading::update)
                .delete(handlers::a002_reading::delete),
        )
        // UseCase u501: Import readings
        .route(
            "/api/u501/import/csv",
            post(handlers::usecases::u501_import_csv).layer(upload_limit),
        )
        .route(
            "/api/u501/import/rows",
            post(handlers::usecases::u501_import_rows).layer(upload_limit),
        )
}
