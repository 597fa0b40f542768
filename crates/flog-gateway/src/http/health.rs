use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;
use flog_core::types::format_day;

/// GET /health: liveness check.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let next_sweep = state.schedule.next_after(state.clock.now());
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "course_id": state.config.golfer.course_id,
        "pending": state.queue.len().await,
        "next_sweep": format_day(next_sweep),
    }))
}
