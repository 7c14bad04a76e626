pub mod client;
pub mod decoder;

pub use client::{HttpClient, Outcome, RequestDescriptor, RequestOptions};
pub use decoder::ApiDecoder;
