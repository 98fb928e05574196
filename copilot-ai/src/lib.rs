//! Capability abstraction layer for the meeting intelligence pipeline.
//!
//! This crate provides trait-based abstractions for the external services the
//! pipeline consumes:
//! - Transcript sources that deliver recorded meeting text
//! - Language models that produce summaries and answers
//! - Embedding providers that turn text into fixed-dimension vectors
//! - Task trackers that hold dispatched action items
//!
//! The design is provider-agnostic, enabling the application to swap between
//! different service providers (Fireflies, Anthropic, OpenAI, Todoist, etc.)
//! without changing pipeline code.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use types::task::TaskRef;
pub use types::transcript::Transcript;
