//! Extraction schemas and data-driven record validation
//!
//! A [`Schema`] is plain data: a record name plus a field → type map. Model
//! responses are parsed into it and candidate records are checked against it
//! by inspecting JSON values directly. Nothing a model writes is ever
//! compiled or executed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tags a schema field may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 text
    #[serde(alias = "str", alias = "text")]
    String,

    /// Whole number
    #[serde(alias = "int")]
    Integer,

    /// Floating-point number (accepts integer values too)
    #[serde(alias = "number", alias = "double")]
    Float,

    /// True/false
    #[serde(alias = "bool")]
    Boolean,

    /// Ordered collection
    #[serde(alias = "array")]
    List,

    /// Nested mapping
    #[serde(alias = "dict", alias = "map")]
    Object,
}

impl FieldType {
    /// Parse a type tag, accepting the aliases language models commonly emit
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Some(Self::String),
            "integer" | "int" => Some(Self::Integer),
            "float" | "number" | "double" => Some(Self::Float),
            "boolean" | "bool" => Some(Self::Boolean),
            "list" | "array" => Some(Self::List),
            "object" | "dict" | "map" => Some(Self::Object),
            _ => None,
        }
    }

    /// Whether `value` satisfies this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::List => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    /// Canonical tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extraction schema: the shape records must take
///
/// Field order is kept stable (sorted) so prompts rendered from a schema are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Record type name, used in prompts and summaries
    pub name: String,

    /// Field name → declared type
    pub structure: BTreeMap<String, FieldType>,
}

impl Schema {
    /// Create an empty schema with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            structure: BTreeMap::new(),
        }
    }

    /// Add a field (builder style)
    pub fn with_field(mut self, field: impl Into<String>, ty: FieldType) -> Self {
        self.structure.insert(field.into(), ty);
        self
    }

    /// Names of all declared fields, in stable order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.structure.keys().map(String::as_str)
    }

    /// Build a schema from a model-produced JSON value
    ///
    /// The value must be an object with a non-empty string `name` and a
    /// non-empty `structure` object whose values are recognized type tags.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or(SchemaError::NotAnObject)?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(SchemaError::MissingName)?;

        let structure = obj
            .get("structure")
            .and_then(Value::as_object)
            .ok_or(SchemaError::MissingStructure)?;

        if structure.is_empty() {
            return Err(SchemaError::EmptyStructure);
        }

        let mut fields = BTreeMap::new();
        for (field, tag) in structure {
            let tag = tag.as_str().ok_or_else(|| SchemaError::UnknownFieldType {
                field: field.clone(),
                tag: tag.to_string(),
            })?;
            let ty = FieldType::parse(tag).ok_or_else(|| SchemaError::UnknownFieldType {
                field: field.clone(),
                tag: tag.to_string(),
            })?;
            fields.insert(field.clone(), ty);
        }

        Ok(Self {
            name: name.to_string(),
            structure: fields,
        })
    }

    /// Validate a candidate record against this schema
    ///
    /// Returns every violation found, not just the first. Fields the schema
    /// does not declare are ignored.
    pub fn validate_record(&self, record: &Value) -> Result<(), Vec<FieldViolation>> {
        let obj = match record.as_object() {
            Some(obj) => obj,
            None => return Err(vec![FieldViolation::NotAnObject]),
        };

        let mut violations = Vec::new();
        for (field, ty) in &self.structure {
            match obj.get(field) {
                None => violations.push(FieldViolation::MissingField {
                    field: field.clone(),
                }),
                Some(value) if !ty.matches(value) => {
                    violations.push(FieldViolation::TypeMismatch {
                        field: field.clone(),
                        expected: *ty,
                        found: json_kind(value).to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// A caller-supplied field request for explicit-schema runs
///
/// Parsed from arguments of the form `name` or `name:type`. When the type
/// hint is absent the model picks a type during schema generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it should appear in extracted records
    pub name: String,

    /// Declared type, when the caller pinned one
    pub type_hint: Option<FieldType>,
}

impl FieldSpec {
    /// Field with no type hint
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
        }
    }

    /// Field with a pinned type
    pub fn typed(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            type_hint: Some(ty),
        }
    }

    /// Parse a `name` or `name:type` argument
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        let input = input.trim();
        let (name, tag) = match input.split_once(':') {
            Some((name, tag)) => (name.trim(), Some(tag.trim())),
            None => (input, None),
        };

        if name.is_empty() {
            return Err(SchemaError::EmptyFieldSpec);
        }

        let type_hint = match tag {
            Some(tag) => Some(FieldType::parse(tag).ok_or_else(|| {
                SchemaError::UnknownFieldType {
                    field: name.to_string(),
                    tag: tag.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            type_hint,
        })
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_hint {
            Some(ty) => write!(f, "{}:{}", self.name, ty),
            None => f.write_str(&self.name),
        }
    }
}

/// Ways a model-produced schema value can be rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The value was not a JSON object
    NotAnObject,

    /// `name` missing, not a string, or empty
    MissingName,

    /// `structure` missing or not an object
    MissingStructure,

    /// `structure` declared no fields
    EmptyStructure,

    /// A field specification had no name
    EmptyFieldSpec,

    /// A field declared a type tag that is not recognized
    UnknownFieldType {
        /// Field name
        field: String,
        /// The unrecognized tag
        tag: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "schema is not a JSON object"),
            Self::MissingName => write!(f, "schema has no usable name"),
            Self::MissingStructure => write!(f, "schema has no structure object"),
            Self::EmptyStructure => write!(f, "schema declares no fields"),
            Self::EmptyFieldSpec => write!(f, "field specification has no name"),
            Self::UnknownFieldType { field, tag } => {
                write!(f, "field '{}' declares unknown type '{}'", field, tag)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// A single way a candidate record failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// Candidate was not a JSON object
    NotAnObject,

    /// A declared field is absent
    MissingField {
        /// Field name
        field: String,
    },

    /// A field holds the wrong JSON type
    TypeMismatch {
        /// Field name
        field: String,
        /// Declared type
        expected: FieldType,
        /// What the candidate actually held
        found: String,
    },
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "record is not a JSON object"),
            Self::MissingField { field } => write!(f, "missing field '{}'", field),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{}' expected {}, found {}", field, expected, found),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
