//! Prompt service implementation.
//!
//! The PromptService advertises the static prompt catalog read from
//! `prompts.json`.

use rmcp::model::{Prompt, PromptArgument};
use tracing::info;

use crate::core::schema::{PromptDescriptor, SchemaError, SchemaLoader};

/// Service for listing the prompt catalog.
#[derive(Debug, Clone, Default)]
pub struct PromptService {
    prompts: Vec<Prompt>,
}

impl PromptService {
    /// Load the catalog through `loader`.
    pub fn load(loader: &SchemaLoader) -> Result<Self, SchemaError> {
        let service = Self::from_descriptors(loader.load_prompts()?);
        info!("Loaded {} prompts", service.prompts.len());
        Ok(service)
    }

    /// Build the service from already loaded descriptors, keeping their order.
    pub fn from_descriptors(descriptors: Vec<PromptDescriptor>) -> Self {
        let prompts = descriptors.into_iter().map(build_prompt).collect();
        Self { prompts }
    }

    /// List all available prompts.
    pub fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts.clone()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

fn build_prompt(descriptor: PromptDescriptor) -> Prompt {
    let arguments = descriptor
        .arguments
        .into_iter()
        .map(|arg| PromptArgument {
            name: arg.name,
            title: None,
            description: Some(arg.description),
            required: Some(arg.required),
        })
        .collect();

    Prompt {
        name: descriptor.name,
        title: None,
        description: Some(descriptor.description),
        arguments: Some(arguments),
        icons: None,
        meta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::PromptArgumentDescriptor;
    use std::path::PathBuf;

    #[test]
    fn test_arguments_keep_required_flag() {
        let service = PromptService::from_descriptors(vec![PromptDescriptor {
            name: "analyze_stock".to_string(),
            description: "Analyze a stock".to_string(),
            arguments: vec![
                PromptArgumentDescriptor {
                    name: "symbol".to_string(),
                    description: "Stock symbol".to_string(),
                    required: true,
                },
                PromptArgumentDescriptor {
                    name: "focus".to_string(),
                    description: "Focus area".to_string(),
                    required: false,
                },
            ],
        }]);

        let prompts = service.list_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "analyze_stock");
        let args = prompts[0].arguments.as_ref().unwrap();
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].required, Some(false));
        assert_eq!(args[1].description.as_deref(), Some("Focus area"));
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let loader = SchemaLoader::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema"));
        let service = PromptService::load(&loader).unwrap();
        assert!(!service.is_empty());
        assert!(service.list_prompts().iter().any(|p| p.name == "analyze_stock"));
    }
}
