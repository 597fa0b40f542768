use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Affiliation, Course, Reservation, ReservationRequest, SessionInfo, TeeTime};

/// The operations the booking flow needs from the reservation site.
///
/// [`GolferClient`](crate::client::GolferClient) is the real implementation;
/// tests substitute in-memory fakes.
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Club the account books at. Affiliations are matched against it.
    fn course_id(&self) -> i64;

    /// The logged-in user, logging in again first when the session is stale.
    async fn session(&self) -> Result<SessionInfo>;

    async fn courses(&self) -> Result<Vec<Course>>;

    /// Slots on `date` (`YYYY-MM-DD`) that can seat `players`.
    async fn tee_times(
        &self,
        af: &Affiliation,
        course: &Course,
        date: &str,
        players: u32,
    ) -> Result<Vec<TeeTime>>;

    /// Priced reservation templates for one slot.
    async fn reservation_options(
        &self,
        af: &Affiliation,
        course: &Course,
        tt: &TeeTime,
        players: u32,
    ) -> Result<Vec<Reservation>>;

    async fn reserve(&self, req: &ReservationRequest) -> Result<Reservation>;

    /// Confirmed reservations that have not been played yet.
    async fn upcoming_reservations(&self) -> Result<Vec<Reservation>>;
}
