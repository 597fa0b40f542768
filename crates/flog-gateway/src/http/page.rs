//! The status page, rendered from `templates/index.html`.

use askama::Template;

use super::status::{PendingView, StatusView, UpcomingView};

pub struct ReservationRow {
    pub date: String,
    pub start_time: String,
    pub players: usize,
}

impl From<&UpcomingView> for ReservationRow {
    fn from(r: &UpcomingView) -> Self {
        Self {
            date: r.date.clone().unwrap_or_else(|| "?".to_string()),
            start_time: r.start_time.clone().unwrap_or_else(|| "?".to_string()),
            players: r.players,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub reservations: Vec<ReservationRow>,
    pub pending: &'a [PendingView],
    pub default_day: &'a str,
    /// Upper bound offered by the party-size input.
    pub max_players: u32,
}

impl<'a> IndexPage<'a> {
    pub fn new(view: &'a StatusView, max_players: u32) -> Self {
        Self {
            reservations: view.reservations.iter().map(ReservationRow::from).collect(),
            pending: &view.pending,
            default_day: &view.default_day,
            max_players,
        }
    }
}
