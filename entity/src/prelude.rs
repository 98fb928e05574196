pub use super::chunks::Entity as Chunks;
pub use super::clients::Entity as Clients;
pub use super::embeddings::Entity as Embeddings;
pub use super::leads::Entity as Leads;
pub use super::meetings::Entity as Meetings;
pub use super::project_mappings::Entity as ProjectMappings;
pub use super::summaries::Entity as Summaries;
pub use super::task_dispatches::Entity as TaskDispatches;
