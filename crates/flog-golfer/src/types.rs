//! Request and response records for the reservation site's private API.
//!
//! The API returns loosely typed JSON where most fields may be missing or
//! `null`. Everything the booking flow does not strictly need is optional,
//! and list fields decode `null` as empty.

use chrono::NaiveDateTime;
use flog_core::types::parse_day;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GolferError, Result};

/// Hole count assumed when a course record omits it.
pub const DEFAULT_HOLES: u32 = 18;

/// The `window.CHRONOGOLF_CONFIG` blob embedded in the landing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "CSRF_TOKEN", default)]
    pub csrf_token: Option<String>,
    #[serde(rename = "HAS_SESSION", default)]
    pub has_session: Option<bool>,
    #[serde(rename = "CLUB_ID", default)]
    pub club_id: Option<i64>,
    #[serde(rename = "CLUB_CURRENCY", default)]
    pub club_currency: Option<String>,
    #[serde(rename = "LOCALE", default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub session: Credentials,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The logged-in user, as returned by `POST /private_api/sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInfo {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub affiliations: Vec<Affiliation>,
}

impl SessionInfo {
    /// The membership record at `course_id`, if the user has one.
    pub fn affiliation_for(&self, course_id: i64) -> Option<&Affiliation> {
        self.affiliations
            .iter()
            .find(|a| a.organization_id == Some(course_id))
    }
}

/// A user's membership at a club. The type id prices the rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Affiliation {
    pub id: i64,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub organization_id: Option<i64>,
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub affiliation_type_id: i64,
}

/// `affiliation_type_ids` query value: the member's type id once per player.
pub fn affiliation_type_ids(af: &Affiliation, players: u32) -> String {
    vec![af.affiliation_type_id.to_string(); players as usize].join(",")
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Course {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub holes: Option<u32>,
    #[serde(default)]
    pub par: Option<u32>,
    #[serde(default)]
    pub round_duration: Option<u32>,
    #[serde(default)]
    pub club_id: Option<i64>,
    #[serde(default)]
    pub online_booking_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeeTime {
    pub id: i64,
    #[serde(default)]
    pub course_id: Option<i64>,
    /// `HH:MM`, local to the club.
    pub start_time: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub hole: Option<u32>,
    #[serde(default)]
    pub free_slots: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub format: Option<String>,
}

impl TeeTime {
    pub fn time(&self) -> Result<NaiveDateTime> {
        parse_day(&format!("{}T{}", self.date, self.start_time))
            .map_err(|e| GolferError::Parse(format!("tee time {}: {e}", self.id)))
    }
}

/// A reservation as the site reports it (upcoming list, options lookup,
/// submit response).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reservation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub club_id: Option<i64>,
    #[serde(default)]
    pub teetime_id: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub holes: Option<u32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub teetime: Option<TeeTime>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rounds: Vec<Round>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Round {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub affiliation_type_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(
        default,
        alias = "round_lines_attributes",
        deserialize_with = "null_as_empty"
    )]
    pub round_lines: Vec<RoundLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A priced product line. Copied verbatim from the options lookup into
/// every round of the submitted reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_rule_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_total: Option<f64>,
}

/// Body of `POST /private_api/reservations`.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationRequest {
    pub reservation: NewReservation,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReservation {
    pub club_id: i64,
    pub teetime_id: i64,
    pub holes: u32,
    pub state: String,
    pub source: String,
    pub made_online: bool,
    pub agreed_on_terms: bool,
    pub rounds_attributes: Vec<NewRound>,
}

/// Guest rounds carry this in place of a user id.
pub const GUEST_USER_ID: i64 = 0;

/// One participant. Only the primary round carries the booking user's id;
/// guests are sent as [`GUEST_USER_ID`], not `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRound {
    pub affiliation_type_id: i64,
    pub state: String,
    pub user_id: i64,
    pub round_lines_attributes: Vec<RoundLine>,
}

fn null_as_empty<'de, D, T>(d: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}
