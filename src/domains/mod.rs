//! Domains module containing business logic organized by bounded contexts.
//!
//! - `tools`: the financial tools clients call
//! - `resources`: the static resource catalog
//! - `prompts`: the static prompt catalog

pub mod prompts;
pub mod resources;
pub mod tools;
