use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/survey", post(handlers::submit_form))
        .route("/api/survey", post(handlers::submit_chatbot))
        .route("/api/state", get(handlers::get_state))
        .route("/api/data", get(handlers::get_data))
        .route("/api/export-csv", get(handlers::export_csv))
        .route("/charts/transport.svg", get(handlers::transport_chart))
        .route("/charts/travel-time.svg", get(handlers::travel_time_chart))
        .with_state(state)
}
