//! Lead domain operations. Leads sit outside the ingestion pipeline; the
//! web layer only records and lists them.

pub use entity_api::lead::{create, list_all, list_by_status, update_status};
