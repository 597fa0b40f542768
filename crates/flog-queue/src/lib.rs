//! `flog-queue`: the pending reservation queue and its JSON file.

pub mod queue;
pub mod store;

pub use queue::{PendingQueue, SweepReport};
pub use store::QueueStore;
