use log::{info, warn};
use url::Url;

/// Base address of the question/feedback backend when `API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Backend connection settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl ApiConfig {
    /// Reads `API_BASE_URL` from the environment, falling back to the local
    /// development address. A malformed value is ignored with a warning rather
    /// than aborting startup.
    pub fn from_env() -> Self {
        let raw = std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let base_url = match Url::parse(&raw) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid API_BASE_URL '{}': {} - falling back to {}", raw, e, DEFAULT_BASE_URL);
                Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
            }
        };

        info!("Using API base URL: {}", base_url);

        Self { base_url }
    }

    pub fn with_base_url(base_url: Url) -> Self {
        Self { base_url }
    }
}
