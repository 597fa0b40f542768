//! `flog-golfer`: client for the Chronogolf reservation site.
//!
//! [`ReservationService`] is the seam the booking flow talks to;
//! [`GolferClient`] implements it over the site's private JSON API.

pub mod app_config;
pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use client::GolferClient;
pub use error::{GolferError, Result};
pub use service::ReservationService;
pub use types::{
    Affiliation, Course, NewReservation, NewRound, Reservation, ReservationRequest, RoundLine,
    SessionInfo, TeeTime,
};
