pub mod api;
pub mod config;
pub mod error;
pub mod interview;

pub use config::ApiConfig;
pub use error::{Error, TIMEOUT_MESSAGE};
pub use interview::{GenerateInput, Phase, Session, SessionController};
