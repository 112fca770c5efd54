//! Resources domain module.
//!
//! Resources are static catalog entries describing the financial data the
//! server can report on. The catalog lives in `schema/resources.json`.

mod service;

pub use service::ResourceService;
