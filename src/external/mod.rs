//! External API clients
//!
//! Outbound calls to the nutrition, AI, and image-search providers.
//! All clients share one reqwest::Client and degrade gracefully when
//! a provider misbehaves.

pub mod edamam;
pub mod images;
pub mod openai;

pub use edamam::EdamamClient;
pub use images::ImageSearch;
pub use openai::{GenerateError, OpenAiClient};
