//! `flog-scheduler`: books queued requests once their window opens.
//!
//! [`SweepEngine`] wakes daily at the configured time (and whenever a
//! [`SweepTrigger`] fires) and hands the queue to a [`Sweeper`], which runs
//! one [`Booker`] attempt per eligible request.

pub mod booker;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod sweep;

#[cfg(test)]
mod testing;

pub use booker::{Booker, Booking};
pub use engine::{SweepEngine, SweepTrigger};
pub use error::{Result, SchedulerError};
pub use schedule::DailySchedule;
pub use sweep::Sweeper;
