//! One pass over the pending queue: book what has opened, keep the rest.

use chrono::NaiveDateTime;
use flog_core::{BookingWindow, Clock, PendingRequest, Result};
use flog_queue::{PendingQueue, SweepReport};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::booker::Booker;

pub struct Sweeper {
    queue: Arc<PendingQueue>,
    booker: Booker,
    window: BookingWindow,
    clock: Arc<dyn Clock>,
}

impl Sweeper {
    pub fn new(
        queue: Arc<PendingQueue>,
        booker: Booker,
        window: BookingWindow,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            queue,
            booker,
            window,
            clock,
        }
    }

    /// Try every request whose booking window has opened.
    ///
    /// Requests that book are removed. Requests that fail, are not yet open,
    /// or carry an unreadable day stay queued for the next sweep. The queue
    /// lock is held for the whole pass.
    pub async fn sweep(&self) -> Result<SweepReport> {
        let now = self.clock.now();
        info!(now = %now, "attempting booking");
        let report = self.queue.sweep(|req| self.keep(req, now)).await?;
        info!(
            examined = report.examined,
            booked = report.removed,
            retained = report.retained,
            "sweep finished"
        );
        Ok(report)
    }

    async fn keep(&self, req: PendingRequest, now: NaiveDateTime) -> bool {
        // a hand-edited queue file can carry any size; never send it upstream
        if let Err(e) = self.window.check_party_size(req.players) {
            warn!(day = %req.day, error = %e, "oversized request left in queue");
            return true;
        }
        match self.window.is_bookable(&req.day, now) {
            Err(e) => {
                warn!(day = %req.day, error = %e, "unreadable request left in queue");
                true
            }
            Ok(false) => {
                debug!(day = %req.day, "not bookable yet");
                true
            }
            Ok(true) => match self.booker.attempt(&req.day, req.players).await {
                Ok(booking) => {
                    info!(
                        day = %req.day,
                        players = req.players,
                        teetime = %format!("{} {}", booking.teetime.date, booking.teetime.start_time),
                        reservation_id = ?booking.reservation_id,
                        "booked"
                    );
                    false
                }
                Err(e) => {
                    warn!(
                        day = %req.day,
                        players = req.players,
                        code = e.code(),
                        error = %e,
                        "booking failed, will retry next sweep"
                    );
                    true
                }
            },
        }
    }
}
