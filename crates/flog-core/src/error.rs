use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlogError {
    #[error("Invalid date {value:?}: {reason}")]
    InvalidDateFormat { value: String, reason: String },

    #[error("Reservation already exists: {day} for {players} player(s)")]
    DuplicateRequest { day: String, players: u32 },

    #[error("Invalid party size {players}: must be between 1 and {max}")]
    InvalidPartySize { players: u32, max: u32 },

    #[error("Failed to persist pending queue to {path}: {reason}")]
    Persistence { path: String, reason: String },

    #[error("No affiliation found for course {course_id}")]
    AffiliationNotFound { course_id: i64 },

    #[error("No courses found")]
    CourseNotFound,

    #[error("No tee times available for {day}")]
    NoTeeTimesAvailable { day: String },

    #[error("Reservation service error ({}): {body}", fmt_status(.status))]
    RemoteService { status: Option<u16>, body: String },

    #[error("App config not found on the landing page")]
    ConfigNotFound,

    #[error("Data file version ({found}) does not match current ({expected})")]
    StaleFormatVersion { found: u32, expected: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlogError {
    /// Short stable error code, used in logs and JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            FlogError::InvalidDateFormat { .. } => "INVALID_DATE_FORMAT",
            FlogError::DuplicateRequest { .. } => "DUPLICATE_REQUEST",
            FlogError::InvalidPartySize { .. } => "INVALID_PARTY_SIZE",
            FlogError::Persistence { .. } => "PERSISTENCE_ERROR",
            FlogError::AffiliationNotFound { .. } => "AFFILIATION_NOT_FOUND",
            FlogError::CourseNotFound => "COURSE_NOT_FOUND",
            FlogError::NoTeeTimesAvailable { .. } => "NO_TEE_TIMES_AVAILABLE",
            FlogError::RemoteService { .. } => "REMOTE_SERVICE_ERROR",
            FlogError::ConfigNotFound => "CONFIG_NOT_FOUND",
            FlogError::StaleFormatVersion { .. } => "STALE_FORMAT_VERSION",
            FlogError::Config(_) => "CONFIG_ERROR",
            FlogError::Io(_) => "IO_ERROR",
        }
    }

    /// Only a stale queue file is allowed to take the process down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FlogError::StaleFormatVersion { .. })
    }

    pub fn persistence(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        FlogError::Persistence {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => s.to_string(),
        None => "no status".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, FlogError>;
