//! Prompts domain module.
//!
//! Prompts are static analysis templates advertised to clients. The catalog
//! lives in `schema/prompts.json`.

mod service;

pub use service::PromptService;
