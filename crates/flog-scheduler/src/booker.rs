//! One booking attempt for one pending request.

use chrono::NaiveDateTime;
use flog_core::types::parse_day;
use flog_core::{FlogError, Result};
use flog_golfer::types::{DEFAULT_HOLES, GUEST_USER_ID};
use flog_golfer::{
    Affiliation, Course, GolferError, NewReservation, NewRound, ReservationRequest,
    ReservationService, RoundLine, TeeTime,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// What a successful attempt reserved.
#[derive(Debug, Clone)]
pub struct Booking {
    pub teetime: TeeTime,
    /// Reservation id from the submit response, when the site returned one.
    pub reservation_id: Option<i64>,
    pub state: Option<String>,
}

/// Books the earliest tee time at or after a requested time.
///
/// Makes exactly one try; a failed attempt is left for the next sweep.
pub struct Booker {
    service: Arc<dyn ReservationService>,
}

impl Booker {
    pub fn new(service: Arc<dyn ReservationService>) -> Self {
        Self { service }
    }

    #[instrument(skip(self))]
    pub async fn attempt(&self, day: &str, players: u32) -> Result<Booking> {
        let target = parse_day(day)?;

        let session = self.service.session().await?;
        let course_id = self.service.course_id();
        let af = session
            .affiliation_for(course_id)
            .cloned()
            .ok_or(FlogError::AffiliationNotFound { course_id })?;

        let course = self
            .service
            .courses()
            .await?
            .into_iter()
            .next()
            .ok_or(FlogError::CourseNotFound)?;

        let date = target.date().format("%Y-%m-%d").to_string();
        let tee_times = self
            .service
            .tee_times(&af, &course, &date, players)
            .await?;
        let no_tee_times = || FlogError::NoTeeTimesAvailable {
            day: day.to_string(),
        };
        if tee_times.is_empty() {
            return Err(no_tee_times());
        }
        let tt = first_at_or_after(tee_times, target)?.ok_or_else(no_tee_times)?;

        info!(teetime_id = tt.id, date = %tt.date, start = %tt.start_time, "reserving");
        let options = self
            .service
            .reservation_options(&af, &course, &tt, players)
            .await?;
        let lines = options
            .into_iter()
            .next()
            .and_then(|opt| opt.rounds.into_iter().next())
            .map(|round| round.round_lines)
            .ok_or(GolferError::NoOptions { teetime_id: tt.id })?;

        let req = build_request(&af, &course, &tt, session.id, course_id, players, lines);
        let confirmation = self.service.reserve(&req).await?;

        Ok(Booking {
            teetime: tt,
            reservation_id: confirmation.id,
            state: confirmation.state,
        })
    }
}

/// The first slot starting at or after `target`.
///
/// The site lists slots in chronological order for the whole day, so this
/// skips anything earlier than the requested time.
pub fn first_at_or_after(
    tee_times: Vec<TeeTime>,
    target: NaiveDateTime,
) -> std::result::Result<Option<TeeTime>, GolferError> {
    for tt in tee_times {
        if tt.time()? >= target {
            return Ok(Some(tt));
        }
    }
    Ok(None)
}

/// One primary round for the booking user plus a guest round per extra
/// player, all priced with the same lines.
pub fn build_request(
    af: &Affiliation,
    course: &Course,
    tt: &TeeTime,
    user_id: i64,
    club_id: i64,
    players: u32,
    lines: Vec<RoundLine>,
) -> ReservationRequest {
    let round = |user_id: i64| NewRound {
        affiliation_type_id: af.affiliation_type_id,
        state: "reserved".to_string(),
        user_id,
        round_lines_attributes: lines.clone(),
    };

    let mut rounds = vec![round(user_id)];
    rounds.extend((1..players).map(|_| round(GUEST_USER_ID)));

    ReservationRequest {
        reservation: NewReservation {
            club_id,
            teetime_id: tt.id,
            holes: course.holes.unwrap_or(DEFAULT_HOLES),
            state: "confirmed".to_string(),
            source: "chronogolf".to_string(),
            made_online: true,
            agreed_on_terms: true,
            rounds_attributes: rounds,
        },
    }
}
