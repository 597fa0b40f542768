use askama::Template;
use axum::{extract::State, response::Html, Json};
use flog_core::FlogError;
use flog_golfer::Reservation;
use serde::Serialize;
use std::sync::Arc;

use super::{page, ApiError};
use crate::app::AppState;

/// Everything the status page shows.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub reservations: Vec<UpcomingView>,
    pub pending: Vec<PendingView>,
    pub default_day: String,
}

#[derive(Debug, Serialize)]
pub struct UpcomingView {
    pub id: Option<i64>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub players: usize,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PendingView {
    pub day: String,
    pub players: u32,
}

impl From<Reservation> for UpcomingView {
    fn from(r: Reservation) -> Self {
        let (date, start_time) = match r.teetime {
            Some(tt) => (Some(tt.date), Some(tt.start_time)),
            None => (None, None),
        };
        Self {
            id: r.id,
            date,
            start_time,
            players: r.rounds.len(),
            state: r.state,
        }
    }
}

impl StatusView {
    /// Upcoming reservations are fetched live; the rest is local.
    pub async fn gather(state: &AppState) -> Result<Self, ApiError> {
        let reservations = state
            .service
            .upcoming_reservations()
            .await
            .map_err(FlogError::from)?
            .into_iter()
            .map(UpcomingView::from)
            .collect();
        let pending = state
            .queue
            .snapshot()
            .await
            .into_iter()
            .map(|p| PendingView {
                day: p.day,
                players: p.players,
            })
            .collect();
        let default_day = state.window.default_day(state.clock.now())?;

        Ok(Self {
            reservations,
            pending,
            default_day,
        })
    }
}

/// GET /: HTML status page with the reservation form.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let view = StatusView::gather(&state).await?;
    let html = page::IndexPage::new(&view, state.window.max_players).render()?;
    Ok(Html(html))
}

/// GET /status: the status page data as JSON.
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusView>, ApiError> {
    Ok(Json(StatusView::gather(&state).await?))
}
