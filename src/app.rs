use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/session/credential", post(handlers::sign_in))
        .route("/form/action", post(handlers::change_action))
        .route("/form/tasks", post(handlers::add_task))
        .route("/form/tasks/:id/remove", post(handlers::remove_task))
        .route("/form/submit", post(handlers::submit))
        .route("/api/form", get(handlers::get_form))
        .route("/api/clock", get(handlers::get_clock))
        .route("/api/session", post(handlers::api_sign_in))
        .route("/api/action", post(handlers::api_set_action))
        .route("/api/tasks", post(handlers::api_add_task))
        .route(
            "/api/tasks/:id",
            put(handlers::api_update_task).delete(handlers::api_remove_task),
        )
        .route("/api/submit", post(handlers::api_submit))
        .with_state(state)
}
