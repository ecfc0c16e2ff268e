use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/auth/login", get(handlers::login_page).post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/dashboard", get(handlers::dashboard))
        .route("/dashboard/client/new", get(handlers::new_client_page).post(handlers::create_client))
        .route("/dashboard/client/:id", get(handlers::client_page))
        .route("/dashboard/client/:id/notes", post(handlers::add_note))
        .route("/api/clients/:id/analytics", get(handlers::get_analytics))
        .with_state(state)
}
