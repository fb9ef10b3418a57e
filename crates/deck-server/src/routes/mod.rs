//! Router assembly. Every route lives under `/api`.

mod chunks;
mod focus;
mod payload;
mod system;
mod tasks;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full API router. `cors_permissive` allows any origin, which the
/// browser board needs when served from a different port.
pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let api = Router::new()
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route("/tasks/bulk", post(tasks::create_bulk))
        .route(
            "/tasks/{id}",
            get(tasks::get_one).put(tasks::update).delete(tasks::remove),
        )
        .route("/chunks", post(chunks::create).get(chunks::list))
        .route(
            "/chunks/{id}",
            get(chunks::get_one).put(chunks::update).delete(chunks::remove),
        )
        .route("/chunks/{id}/start", post(chunks::start))
        .route("/board", get(system::board))
        .route("/reset", post(system::reset))
        .route("/health", get(system::health))
        .route("/focus", get(focus::current))
        .route("/focus/pause", post(focus::pause))
        .route("/focus/resume", post(focus::resume))
        .route("/focus/stop", post(focus::stop))
        .route("/focus/finish", post(focus::finish))
        .route("/focus/tasks/{id}/toggle", post(focus::toggle_task))
        .route("/focus/tasks/{id}", delete(focus::remove_task));

    let app = Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
