//! HTTP gateways for the external providers the pipeline consumes. Each
//! client implements its capability trait from `copilot-ai`.

pub mod anthropic;
pub mod fireflies;
pub mod openai;
pub mod todoist;
