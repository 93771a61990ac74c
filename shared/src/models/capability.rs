//! Printer capability model
//!
//! Agents and operators both describe a printer's capabilities, but the
//! wire shape is loose: an array holding one record, a bare object, or
//! nothing at all, with any field missing. [`normalize`] is the single
//! adapter from that untyped input into [`Capabilities`]; everything past
//! it works on strict types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability type used when neither source provides one
pub const DEFAULT_CAPABILITY_TYPE: &str = "B/W";

/// Normalized capability record
///
/// `kind` and `duplex` stay `None` when the source did not provide them, so
/// the resolver can tell "explicitly false" apart from "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplex: Option<bool>,
    #[serde(default)]
    pub paper_sizes: Vec<String>,
}

impl Capabilities {
    /// Wire representation (`{ type?, duplex?, paperSizes }`)
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(kind) = &self.kind {
            map.insert("type".into(), Value::String(kind.clone()));
        }
        if let Some(duplex) = self.duplex {
            map.insert("duplex".into(), Value::Bool(duplex));
        }
        map.insert(
            "paperSizes".into(),
            Value::Array(self.paper_sizes.iter().cloned().map(Value::String).collect()),
        );
        Value::Object(map)
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.duplex.is_none() && self.paper_sizes.is_empty()
    }
}

/// Convert a loosely-typed capability source into [`Capabilities`]
///
/// - arrays: only the first element is consulted
/// - `type` / `Type`: kept only when it is a non-empty string
/// - `duplex`: kept whenever the key exists, coerced with JS truthiness
/// - `paperSizes`: always a list, every element coerced to a string
///
/// Malformed input degrades to an empty record, never an error.
pub fn normalize(source: &Value) -> Capabilities {
    let record = match source {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    let Some(Value::Object(map)) = record else {
        return Capabilities::default();
    };

    let kind = ["type", "Type"].iter().find_map(|key| match map.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    });

    let duplex = map.get("duplex").map(is_truthy);

    let paper_sizes = match map.get("paperSizes") {
        Some(Value::Array(sizes)) => sizes.iter().map(coerce_string).collect(),
        _ => Vec::new(),
    };

    Capabilities {
        kind,
        duplex,
        paper_sizes,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Canonical capability type shown to operators and customers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityType {
    Color,
    #[serde(rename = "B/W")]
    BlackWhite,
}

impl CapabilityType {
    /// Any raw value containing "color" (case-insensitive) is `Color`
    pub fn canonicalize(raw: &str) -> Self {
        if raw.to_ascii_lowercase().contains("color") {
            Self::Color
        } else {
            Self::BlackWhite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::BlackWhite => "B/W",
        }
    }
}

impl std::fmt::Display for CapabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final per-field capability values after override precedence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCapabilities {
    #[serde(rename = "type")]
    pub capability_type: CapabilityType,
    pub duplex: bool,
    pub paper_sizes: Vec<String>,
}

/// Merge agent-detected and manual capabilities, manual winning per field
pub fn resolve(agent: &Capabilities, manual: &Capabilities) -> ResolvedCapabilities {
    let raw_type = manual
        .kind
        .as_deref()
        .or(agent.kind.as_deref())
        .unwrap_or(DEFAULT_CAPABILITY_TYPE);

    let paper_sizes = if manual.paper_sizes.is_empty() {
        agent.paper_sizes.clone()
    } else {
        manual.paper_sizes.clone()
    };

    ResolvedCapabilities {
        capability_type: CapabilityType::canonicalize(raw_type),
        duplex: manual.duplex.or(agent.duplex).unwrap_or(false),
        paper_sizes,
    }
}

/// Pick the display name: manual override, then agent name, then the raw id
pub fn resolve_name(manual: Option<&str>, agent: Option<&str>, printer_id: &str) -> String {
    manual
        .filter(|n| !n.is_empty())
        .or(agent.filter(|n| !n.is_empty()))
        .unwrap_or(printer_id)
        .to_string()
}
