use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

use super::client::{HttpClient, Outcome, RequestDescriptor};

/// Wraps the request client with JSON decoding and the uniform error mapping
/// the UI layer depends on.
#[derive(Clone, Default)]
pub struct ApiDecoder {
    client: HttpClient,
}

impl ApiDecoder {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
        }
    }

    /// Issues the request and parses the body into `T`. Non-success outcomes
    /// become structured errors with a human-readable message.
    pub async fn request<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T, Error> {
        match self.client.send(descriptor).await {
            Outcome::Success { status, body } => {
                debug!("Decoding {} byte response (status {})", body.len(), status);
                serde_json::from_str(&body).map_err(Error::Decode)
            }
            Outcome::ClientError { status, body } => Err(Error::Client {
                status,
                message: extract_error_message(&body, status),
            }),
            Outcome::ServerError { status, body } => Err(Error::Server {
                status,
                message: extract_error_message(&body, status),
            }),
            Outcome::NetworkFailure { message } => Err(Error::Network(message)),
            Outcome::Timeout => Err(Error::Timeout),
        }
    }
}

/// Pulls the most specific message out of an error body. Preference order is
/// a structured `error` field, then `message`, then the generic fallback.
/// The UI shows these strings verbatim, so the mapping is a contract.
fn extract_error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    format!("HTTP error! status: {}", status)
}
