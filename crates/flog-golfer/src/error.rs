use flog_core::FlogError;
use thiserror::Error;

/// Errors talking to the reservation site.
#[derive(Debug, Error)]
pub enum GolferError {
    /// Transport failure, timeout or TLS error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The site answered with an unexpected status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The landing page had no `window.CHRONOGOLF_CONFIG` blob with a CSRF token.
    #[error("failed to find app config")]
    ConfigNotFound,

    #[error("need to specify a username and password")]
    Credentials,

    /// The options lookup returned nothing to price the rounds with.
    #[error("no reservation options for tee time {teetime_id}")]
    NoOptions { teetime_id: i64 },
}

impl From<GolferError> for FlogError {
    fn from(e: GolferError) -> Self {
        match e {
            GolferError::Http(e) => FlogError::RemoteService {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            },
            GolferError::Api { status, body } => FlogError::RemoteService {
                status: Some(status),
                body,
            },
            GolferError::ConfigNotFound => FlogError::ConfigNotFound,
            GolferError::Credentials => FlogError::Config(GolferError::Credentials.to_string()),
            other @ (GolferError::Parse(_) | GolferError::NoOptions { .. }) => {
                FlogError::RemoteService {
                    status: None,
                    body: other.to_string(),
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GolferError>;
