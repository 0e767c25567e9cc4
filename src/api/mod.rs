pub mod handlers;

use std::sync::Arc;
use axum::{Router, routing::post};

use crate::adapter::InfyTvAdapter;
use crate::logging::logger::AuditLogger;

#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<InfyTvAdapter>,
    pub audit_logger: Arc<AuditLogger>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/requests", post(handlers::handle_make_requests))
        .route("/bids", post(handlers::handle_make_bids))
        .with_state(state)
}
