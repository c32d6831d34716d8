//! Remote generative AI: prompt construction and the HTTP-backed adapter.

pub mod adapter;
pub mod prompt;

pub use adapter::{clean_reply, GeminiAdapter, GeminiConfig, RemoteAi};
pub use prompt::{build_prompt, priority_context, PERSONA, PROBE_PROMPT};
