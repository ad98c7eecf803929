pub mod handlers;

use crate::service::DebitNoteService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub use handlers::*;

/// 构建路由
pub fn router(service: Arc<DebitNoteService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/debit-notes/:debit_id",
            get(get_debit_note).put(update_debit_note),
        )
        .route("/api/debit-notes/:debit_id/journal", get(debit_note_journal))
        .with_state(service)
}
