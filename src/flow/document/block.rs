// SPDX-License-Identifier: MIT

//! Blocks and their validation settings

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::flow::value::as_number;

/// A question or content unit within a page
///
/// Variant-specific settings live in `properties`; the typed accessors
/// below cover the ones the runtime reads.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Validations::is_empty")]
    pub validations: Validations,
}

/// Supported block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    TextInput,
    MultipleChoice,
    PictureChoice,
    Dropdown,
    Slider,
    Heading,
    Paragraph,
    Gauge,
    StatCards,
    List,
    Image,
    Loader,
    Progress,
    Spacer,
    Html,
    /// Block type this runtime does not know; rendered as inert content
    #[serde(other)]
    Unknown,
}

impl BlockKind {
    /// Kinds that record an answer
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            BlockKind::TextInput
                | BlockKind::MultipleChoice
                | BlockKind::PictureChoice
                | BlockKind::Dropdown
                | BlockKind::Slider
        )
    }

    /// Kinds whose answer is a deliberate pick that can end the page
    pub fn is_answerable(&self) -> bool {
        matches!(
            self,
            BlockKind::TextInput
                | BlockKind::MultipleChoice
                | BlockKind::Dropdown
                | BlockKind::PictureChoice
        )
    }
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: Map::new(),
            validations: Validations::default(),
        }
    }

    /// Set a property (builder style)
    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    /// Add a validation (builder style)
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validations.0.push(validation);
        self
    }

    /// Whether a choice block accepts several selections
    pub fn is_multiple(&self) -> bool {
        self.properties
            .get("multiple")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A single validation rule
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Required,
    MinLength(usize),
    MaxLength(usize),
    MinChoices(usize),
    MaxChoices(usize),
    Min(f64),
    Max(f64),
    Pattern(String),
}

impl Validation {
    /// Parse one `kind: parameter` entry. `None` for disabled, unknown, or
    /// unusable entries.
    fn parse(kind: &str, param: &Value) -> Option<Self> {
        if matches!(param, Value::Null | Value::Bool(false)) {
            return None;
        }
        let count = || as_number(param).filter(|n| *n >= 0.0).map(|n| n as usize);
        match kind {
            "required" => Some(Validation::Required),
            "minLength" => count().map(Validation::MinLength),
            "maxLength" => count().map(Validation::MaxLength),
            "minChoices" => count().map(Validation::MinChoices),
            "maxChoices" => count().map(Validation::MaxChoices),
            "min" => as_number(param).map(Validation::Min),
            "max" => as_number(param).map(Validation::Max),
            "pattern" => param.as_str().map(|p| Validation::Pattern(p.to_string())),
            other => {
                log::debug!("Ignoring unknown validation '{}'", other);
                None
            }
        }
    }

    /// Authored key for this validation
    pub fn key(&self) -> &'static str {
        match self {
            Validation::Required => "required",
            Validation::MinLength(_) => "minLength",
            Validation::MaxLength(_) => "maxLength",
            Validation::MinChoices(_) => "minChoices",
            Validation::MaxChoices(_) => "maxChoices",
            Validation::Min(_) => "min",
            Validation::Max(_) => "max",
            Validation::Pattern(_) => "pattern",
        }
    }

    fn param(&self) -> Value {
        match self {
            Validation::Required => Value::Bool(true),
            Validation::MinLength(n)
            | Validation::MaxLength(n)
            | Validation::MinChoices(n)
            | Validation::MaxChoices(n) => Value::from(*n),
            Validation::Min(n) | Validation::Max(n) => Value::from(*n),
            Validation::Pattern(p) => Value::String(p.clone()),
        }
    }
}

/// Active validations of a block, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validations(pub Vec<Validation>);

impl Validations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Validation> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Validations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Validations(
            raw.iter()
                .filter_map(|(kind, param)| Validation::parse(kind, param))
                .collect(),
        ))
    }
}

impl Serialize for Validations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|v| (v.key().to_string(), v.param()))
            .collect();
        map.serialize(serializer)
    }
}
