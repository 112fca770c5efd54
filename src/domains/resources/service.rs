//! Resource service implementation.
//!
//! The ResourceService advertises the static resource catalog read from
//! `resources.json`. Adding a resource only requires editing that document.

use rmcp::model::{AnnotateAble, RawResource, Resource};
use tracing::info;

use crate::core::schema::{ResourceDescriptor, SchemaError, SchemaLoader};

/// Service for listing the resource catalog.
#[derive(Debug, Clone, Default)]
pub struct ResourceService {
    resources: Vec<Resource>,
}

impl ResourceService {
    /// Load the catalog through `loader`.
    pub fn load(loader: &SchemaLoader) -> Result<Self, SchemaError> {
        let service = Self::from_descriptors(loader.load_resources()?);
        info!("Loaded {} resources", service.resources.len());
        Ok(service)
    }

    /// Build the service from already loaded descriptors, keeping their order.
    pub fn from_descriptors(descriptors: Vec<ResourceDescriptor>) -> Self {
        let resources = descriptors.into_iter().map(build_resource).collect();
        Self { resources }
    }

    /// List all available resources.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources.clone()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn build_resource(descriptor: ResourceDescriptor) -> Resource {
    let mut raw = RawResource::new(descriptor.uri, descriptor.name);
    raw.description = Some(descriptor.description);
    raw.mime_type = Some(descriptor.mime_type);
    raw.no_annotation()
}
