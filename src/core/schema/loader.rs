//! Read-through loader for tool schemas and the resource/prompt catalogs.

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::debug;

use super::error::SchemaError;

/// JSON-Schema primitive type names understood by the argument validator.
const KNOWN_TYPES: &[&str] = &[
    "string", "integer", "number", "boolean", "object", "array", "null",
];

static EMPTY_OBJECT: LazyLock<JsonObject> = LazyLock::new(JsonObject::new);

/// A tool's input schema.
///
/// The document has already been checked for the shape the validator relies
/// on: a root `object` with a `properties` map, and `required` entries that
/// name declared properties.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    name: String,
    document: Arc<JsonObject>,
}

impl ToolSchema {
    /// Build a schema from a parsed JSON document, checking its shape.
    pub fn from_value(name: impl Into<String>, value: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let Value::Object(document) = value else {
            return Err(SchemaError::invalid(&name, "root must be a JSON object"));
        };

        check_object_schema(&name, "", &document)?;

        Ok(Self {
            name,
            document: Arc::new(document),
        })
    }

    /// The tool this schema belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full schema document, as advertised to clients.
    pub fn document(&self) -> Arc<JsonObject> {
        Arc::clone(&self.document)
    }

    /// Declared properties.
    pub fn properties(&self) -> &JsonObject {
        // Presence and type were checked in `from_value`.
        self.document
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&EMPTY_OBJECT)
    }

    /// Names of required properties.
    pub fn required(&self) -> Vec<&str> {
        required_names(&self.document)
    }
}

fn required_names(schema: &JsonObject) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Check that `schema` describes an object: `type: "object"`, a `properties`
/// map of property schemas, and a `required` list drawn from those properties.
fn check_object_schema(tool: &str, path: &str, schema: &JsonObject) -> Result<(), SchemaError> {
    let at = |msg: String| {
        if path.is_empty() {
            SchemaError::invalid(tool, msg)
        } else {
            SchemaError::invalid(tool, format!("{path}: {msg}"))
        }
    };

    match schema.get("type").and_then(Value::as_str) {
        Some("object") => {}
        Some(other) => return Err(at(format!("expected type 'object', found '{other}'"))),
        None => return Err(at("missing 'type'".to_string())),
    }

    let properties = schema
        .get("properties")
        .ok_or_else(|| at("missing 'properties'".to_string()))?
        .as_object()
        .ok_or_else(|| at("'properties' must be an object".to_string()))?;

    for (prop_name, prop_schema) in properties {
        let prop_path = if path.is_empty() {
            prop_name.clone()
        } else {
            format!("{path}.{prop_name}")
        };
        let prop = prop_schema
            .as_object()
            .ok_or_else(|| SchemaError::invalid(tool, format!("{prop_path}: must be an object")))?;

        if let Some(ty) = prop.get("type") {
            let ty = ty.as_str().ok_or_else(|| {
                SchemaError::invalid(tool, format!("{prop_path}: 'type' must be a string"))
            })?;
            if !KNOWN_TYPES.contains(&ty) {
                return Err(SchemaError::invalid(
                    tool,
                    format!("{prop_path}: unknown type '{ty}'"),
                ));
            }
            if ty == "object" && prop.contains_key("properties") {
                check_object_schema(tool, &prop_path, prop)?;
            }
        }

        if let Some(values) = prop.get("enum") {
            if !values.is_array() {
                return Err(SchemaError::invalid(
                    tool,
                    format!("{prop_path}: 'enum' must be an array"),
                ));
            }
        }
    }

    if let Some(required) = schema.get("required") {
        let required = required
            .as_array()
            .ok_or_else(|| at("'required' must be an array".to_string()))?;
        for entry in required {
            let field = entry
                .as_str()
                .ok_or_else(|| at("'required' entries must be strings".to_string()))?;
            if !properties.contains_key(field) {
                return Err(at(format!("required field '{field}' is not a declared property")));
            }
        }
    }

    Ok(())
}

/// A static resource advertised to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

fn default_mime_type() -> String {
    "text/plain".to_string()
}

/// A static prompt advertised to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub arguments: Vec<PromptArgumentDescriptor>,
}

/// One argument accepted by a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptArgumentDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct ResourceCatalog {
    #[serde(default)]
    resources: Vec<ResourceDescriptor>,
}

#[derive(Debug, Default, Deserialize)]
struct PromptCatalog {
    #[serde(default)]
    prompts: Vec<PromptDescriptor>,
}

/// Loads schema documents from a directory.
///
/// Nothing is cached: every call re-reads the filesystem. Documents are only
/// read at startup, and configuration is static for the process lifetime.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    schema_dir: PathBuf,
}

impl SchemaLoader {
    /// Create a loader rooted at `schema_dir`.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
        }
    }

    /// The directory documents are read from.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Load the input schema for `name` from `services/<name>.json`.
    pub fn load_service_schema(&self, name: &str) -> Result<ToolSchema, SchemaError> {
        let path = self.schema_dir.join("services").join(format!("{name}.json"));
        debug!("Loading schema for {} from {}", name, path.display());

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SchemaError::NotFound {
                    name: name.to_string(),
                    path,
                });
            }
            Err(source) => return Err(SchemaError::Io { path, source }),
        };

        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| SchemaError::invalid(name, format!("not valid JSON: {e}")))?;

        ToolSchema::from_value(name, value)
    }

    /// Load the static resource catalog from `resources.json`.
    ///
    /// A missing file yields an empty catalog.
    pub fn load_resources(&self) -> Result<Vec<ResourceDescriptor>, SchemaError> {
        let catalog: ResourceCatalog = self.load_catalog("resources.json")?;
        Ok(catalog.resources)
    }

    /// Load the static prompt catalog from `prompts.json`.
    ///
    /// A missing file yields an empty catalog.
    pub fn load_prompts(&self) -> Result<Vec<PromptDescriptor>, SchemaError> {
        let catalog: PromptCatalog = self.load_catalog("prompts.json")?;
        Ok(catalog.prompts)
    }

    fn load_catalog<T>(&self, file_name: &str) -> Result<T, SchemaError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.schema_dir.join(file_name);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not present, using an empty catalog", path.display());
                return Ok(T::default());
            }
            Err(source) => return Err(SchemaError::Io { path, source }),
        };

        serde_json::from_str(&raw).map_err(|e| SchemaError::config_invalid(&path, e.to_string()))
    }
}
