use uuid::Uuid;

pub mod prelude;

// Core entities
pub mod chunks;
pub mod clients;
pub mod embeddings;
pub mod leads;
pub mod meetings;
pub mod project_mappings;
pub mod summaries;
pub mod task_dispatches;

// Pipeline enums
pub mod meeting_status;
pub mod meeting_type;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
