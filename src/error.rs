use thiserror::Error;

/// Fixed user-facing timeout text. The free-tier backend can take close to a
/// minute to cold-start, and the UI shows this string verbatim.
pub const TIMEOUT_MESSAGE: &str =
    "Request timeout. The server might be waking up (this can take up to 60 seconds on free tier). Please try again.";

/// Everything a controller action can fail with. None of these are fatal;
/// the controller turns them into the session's `error` string and the user
/// retries the action.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or blank required input. Never sent over the network.
    #[error("{0}")]
    Validation(String),

    /// 4xx response. Surfaced verbatim, never retried.
    #[error("{message}")]
    Client { status: u16, message: String },

    /// 5xx response after the retry budget was exhausted.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Transport-level failure after the retry budget was exhausted.
    #[error("{0}")]
    Network(String),

    /// Per-attempt deadline exceeded. Never retried.
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    /// Response claimed success but the body was not parseable JSON.
    #[error("Failed to parse server response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// True when retrying the same user action could plausibly succeed
    /// without the user changing their input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Server { .. } | Error::Network(_) | Error::Timeout
        )
    }
}
