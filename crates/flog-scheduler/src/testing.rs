//! In-memory reservation site for scheduler tests.

use async_trait::async_trait;
use flog_golfer::types::Round;
use flog_golfer::{
    Affiliation, Course, GolferError, Reservation, ReservationRequest, ReservationService,
    RoundLine, SessionInfo, TeeTime,
};
use std::sync::Mutex;

pub const COURSE_ID: i64 = 17078;
pub const USER_ID: i64 = 4242;

pub fn tee_time(id: i64, date: &str, start: &str) -> TeeTime {
    TeeTime {
        id,
        start_time: start.to_string(),
        date: date.to_string(),
        ..TeeTime::default()
    }
}

/// Serves the same slots for whatever date is asked, and records every
/// submitted reservation.
pub struct FakeService {
    pub affiliation_org: Option<i64>,
    pub no_courses: bool,
    pub tee_times: Vec<TeeTime>,
    pub no_options: bool,
    pub reject_with: Option<u16>,
    pub(crate) submitted: Mutex<Vec<ReservationRequest>>,
    pub(crate) queried: Mutex<Vec<String>>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            affiliation_org: Some(COURSE_ID),
            no_courses: false,
            tee_times: vec![
                tee_time(1, "", "06:50"),
                tee_time(2, "", "07:20"),
                tee_time(3, "", "07:30"),
            ],
            no_options: false,
            reject_with: None,
            submitted: Mutex::new(Vec::new()),
            queried: Mutex::new(Vec::new()),
        }
    }
}

impl FakeService {
    pub fn submitted(&self) -> Vec<ReservationRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn queried_dates(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReservationService for FakeService {
    fn course_id(&self) -> i64 {
        COURSE_ID
    }

    async fn session(&self) -> flog_golfer::Result<SessionInfo> {
        Ok(SessionInfo {
            id: USER_ID,
            affiliations: vec![Affiliation {
                id: 1,
                organization_id: self.affiliation_org,
                affiliation_type_id: 55,
                ..Affiliation::default()
            }],
            ..SessionInfo::default()
        })
    }

    async fn courses(&self) -> flog_golfer::Result<Vec<Course>> {
        if self.no_courses {
            return Ok(Vec::new());
        }
        Ok(vec![Course {
            id: 9,
            holes: Some(18),
            ..Course::default()
        }])
    }

    async fn tee_times(
        &self,
        _af: &Affiliation,
        _course: &Course,
        date: &str,
        _players: u32,
    ) -> flog_golfer::Result<Vec<TeeTime>> {
        self.queried.lock().unwrap().push(date.to_string());
        Ok(self
            .tee_times
            .iter()
            .map(|tt| TeeTime {
                date: date.to_string(),
                ..tt.clone()
            })
            .collect())
    }

    async fn reservation_options(
        &self,
        _af: &Affiliation,
        _course: &Course,
        _tt: &TeeTime,
        _players: u32,
    ) -> flog_golfer::Result<Vec<Reservation>> {
        if self.no_options {
            return Ok(vec![Reservation::default()]);
        }
        Ok(vec![Reservation {
            rounds: vec![Round {
                round_lines: vec![RoundLine {
                    product_id: Some(7),
                    unit_price: Some(42.5),
                    ..RoundLine::default()
                }],
                ..Round::default()
            }],
            ..Reservation::default()
        }])
    }

    async fn reserve(&self, req: &ReservationRequest) -> flog_golfer::Result<Reservation> {
        if let Some(status) = self.reject_with {
            return Err(GolferError::Api {
                status,
                body: "{\"errors\":[\"slot taken\"]}".to_string(),
            });
        }
        self.submitted.lock().unwrap().push(req.clone());
        Ok(Reservation {
            id: Some(555),
            state: Some("confirmed".to_string()),
            teetime_id: Some(req.reservation.teetime_id),
            ..Reservation::default()
        })
    }

    async fn upcoming_reservations(&self) -> flog_golfer::Result<Vec<Reservation>> {
        Ok(Vec::new())
    }
}
