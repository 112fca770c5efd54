//! Externally stored schema documents.
//!
//! Tool input schemas, the static resource catalog and the static prompt
//! catalog are data, not code. They live in a directory laid out as:
//!
//! ```text
//! schema/
//! ├── resources.json
//! ├── prompts.json
//! └── services/
//!     ├── get_stock_quote.json
//!     └── ...
//! ```
//!
//! Adding a tool means adding a document under `services/` and registering a
//! service; the dispatch core does not change.

mod error;
mod loader;

pub use error::SchemaError;
pub use loader::{
    PromptArgumentDescriptor, PromptDescriptor, ResourceDescriptor, SchemaLoader, ToolSchema,
};
