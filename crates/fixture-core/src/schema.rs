//! Fixture schema definitions loaded from YAML.
//!
//! A schema describes fixtures without Rust types: each field names a
//! declared [`FieldKind`] and the [`Descriptor`] that populates it.
//!
//! ```yaml
//! version: 1
//! seed: 42
//! fixtures:
//!   - name: users
//!     fields:
//!       - name: token
//!         type: string
//!         generator:
//!           kind: string
//!           charset: hexadecimal
//!           length: 32
//!       - name: tags
//!         type:
//!           type: list
//!           element_type: string
//!         generator:
//!           kind: list
//!           size: 3
//! ```

use crate::descriptor::Descriptor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Fixture not found in schema
    #[error("Fixture not found: {0}")]
    FixtureNotFound(String),

    /// Field not found in fixture definition
    #[error("Field '{field}' not found in fixture '{fixture}'")]
    FieldNotFound { fixture: String, field: String },
}

// ============================================================================
// Field Kinds
// ============================================================================

/// Declared type of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Date,
    Instant,
    /// Named enum with its declared variants
    Enum { name: String, values: Vec<String> },
    List { element_type: Box<FieldKind> },
}

// Supports both simple string format ("int", "string") and map format
// ({"type": "list", "element_type": "int"})

impl Serialize for FieldKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Bool => serializer.serialize_str("bool"),
            Self::Int => serializer.serialize_str("int"),
            Self::Long => serializer.serialize_str("long"),
            Self::Float => serializer.serialize_str("float"),
            Self::Double => serializer.serialize_str("double"),
            Self::String => serializer.serialize_str("string"),
            Self::Date => serializer.serialize_str("date"),
            Self::Instant => serializer.serialize_str("instant"),
            Self::Enum { name, values } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "enum")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("values", values)?;
                map.end()
            }
            Self::List { element_type } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "list")?;
                map.serialize_entry("element_type", element_type)?;
                map.end()
            }
        }
    }
}

fn simple_kind(name: &str) -> Option<FieldKind> {
    match name {
        "bool" | "boolean" => Some(FieldKind::Bool),
        "int" | "integer" => Some(FieldKind::Int),
        "long" => Some(FieldKind::Long),
        "float" => Some(FieldKind::Float),
        "double" => Some(FieldKind::Double),
        "string" | "text" => Some(FieldKind::String),
        "date" => Some(FieldKind::Date),
        "instant" | "timestamp" => Some(FieldKind::Instant),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FieldKindVisitor;

        impl<'de> Visitor<'de> for FieldKindVisitor {
            type Value = FieldKind;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or map representing a field type")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                simple_kind(value).ok_or_else(|| E::custom(format!("unknown field type: {value}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                if let Some(kind) = simple_kind(&type_name) {
                    return Ok(kind);
                }

                match type_name.as_str() {
                    "enum" => {
                        let values = get_field_required(&fields, "values")?;
                        let name = get_field(&fields, "name").unwrap_or_else(|| "enum".to_string());
                        Ok(FieldKind::Enum { name, values })
                    }
                    "list" => {
                        let element_type: FieldKind = get_field_required(&fields, "element_type")?;
                        Ok(FieldKind::List {
                            element_type: Box::new(element_type),
                        })
                    }
                    _ => Err(M::Error::custom(format!("unknown field type: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(FieldKindVisitor)
    }
}

fn get_field<T: for<'de> Deserialize<'de>>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<T> {
    fields
        .get(key)
        .and_then(|v| serde_yaml::from_value(v.clone()).ok())
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

// ============================================================================
// Fixture Definitions
// ============================================================================

/// A single generated field of a schema fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureField {
    /// Field name
    pub name: String,

    /// Declared field type
    #[serde(rename = "type")]
    pub field_type: FieldKind,

    /// Descriptor that populates this field
    pub generator: Descriptor,
}

/// A named fixture and its generated fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDefinition {
    /// Fixture name
    pub name: String,

    /// Field definitions, in declaration order
    pub fields: Vec<FixtureField>,
}

impl FixtureDefinition {
    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FixtureField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

fn default_version() -> u32 {
    1
}

/// Full fixture schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Optional seed for reproducible generation
    #[serde(default)]
    pub seed: Option<u64>,

    /// Fixture definitions
    pub fixtures: Vec<FixtureDefinition>,

    /// Cached fixture lookup (not serialized)
    #[serde(skip)]
    fixture_map: HashMap<String, usize>,
}

impl FixtureSchema {
    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: FixtureSchema = serde_yaml::from_str(yaml)?;
        schema.build_fixture_map();
        Ok(schema)
    }

    fn build_fixture_map(&mut self) {
        self.fixture_map = self
            .fixtures
            .iter()
            .enumerate()
            .map(|(idx, fixture)| (fixture.name.clone(), idx))
            .collect();
    }

    /// Get a fixture definition by name.
    pub fn get_fixture(&self, name: &str) -> Option<&FixtureDefinition> {
        self.fixture_map
            .get(name)
            .and_then(|&idx| self.fixtures.get(idx))
    }

    /// Get a fixture definition by name, failing if it is absent.
    pub fn require_fixture(&self, name: &str) -> Result<&FixtureDefinition, SchemaError> {
        self.get_fixture(name)
            .ok_or_else(|| SchemaError::FixtureNotFound(name.to_string()))
    }

    /// Get the declared type of a field in a specific fixture.
    pub fn get_field_type(&self, fixture: &str, field: &str) -> Result<&FieldKind, SchemaError> {
        self.require_fixture(fixture)?
            .get_field(field)
            .map(|f| &f.field_type)
            .ok_or_else(|| SchemaError::FieldNotFound {
                fixture: fixture.to_string(),
                field: field.to_string(),
            })
    }

    /// Get all fixture names in the schema.
    pub fn fixture_names(&self) -> Vec<&str> {
        self.fixtures.iter().map(|f| f.name.as_str()).collect()
    }
}
