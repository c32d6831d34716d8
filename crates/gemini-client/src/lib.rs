//! Client for Google's Generative Language `generateContent` endpoint.
//!
//! The crate only knows the JSON shape of the endpoint. Prompt construction,
//! credential storage and fallback policy belong to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use gemini_client::{Client, GenerateContentRequest, GenerationConfig};
//!
//! # async fn example() -> Result<(), gemini_client::GeminiError> {
//! let client = Client::builder().build()?;
//! let request = GenerateContentRequest::from_prompt("Hello", GenerationConfig::default());
//! let response = client
//!     .generate_content(gemini_client::models::GEMINI_1_5_FLASH, "AIza...", &request)
//!     .await?;
//! println!("{:?}", response.first_text());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;

pub use client::{Client, ClientBuilder, DEFAULT_ENDPOINT};
pub use error::GeminiError;
pub use types::*;

/// Model identifiers known to work with `generateContent`.
pub mod models {
    /// Gemini 1.5 Flash - fast, inexpensive
    pub const GEMINI_1_5_FLASH: &str = "gemini-1.5-flash";
    /// Gemini 2.0 Flash
    pub const GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";
}
