//! `flog-core`: shared types, config and booking-window logic.

pub mod clock;
pub mod config;
pub mod error;
pub mod types;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{FlogError, Result};
pub use types::{PendingRequest, QueueState, DATA_FORMAT_VERSION, DATE_FORMAT};
pub use window::BookingWindow;
