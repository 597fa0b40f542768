use axum::{extract::State, response::Redirect, Form};
use flog_core::types::{format_day, parse_day};
use flog_core::PendingRequest;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::ApiError;
use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ReserveForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub players: String,
}

/// POST /reserve: queue a request and ask for an immediate sweep.
pub async fn reserve_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ReserveForm>,
) -> Result<Redirect, ApiError> {
    let target = parse_day(form.date.trim())?;
    let players = form
        .players
        .trim()
        .parse::<u32>()
        .map_err(|_| ApiError::BadRequest(format!("invalid players value: {:?}", form.players)))?;
    state.window.check_party_size(players)?;

    // normalise so "2018-05-19T7:10" and "2018-05-19T07:10" are the same request
    let req = PendingRequest::new(format_day(target), players);
    state.queue.add(req).await?;
    state.trigger.fire();

    Ok(Redirect::to("/"))
}

/// POST /cancel: drop every pending request.
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    state.queue.clear().await?;
    info!("pending requests cancelled");
    Ok(Redirect::to("/"))
}
