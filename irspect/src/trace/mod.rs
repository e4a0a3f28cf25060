//! Symbolic execution trace
//!
//! The analyzer's data-flow record: named symbolic values (parameters and
//! inferred computed values), the sequence of detected operations, an optional
//! resolved return value, and issues accumulated during trace construction.
//! A trace is built fresh per `interpret` call and owned by that call.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::issue::SemanticIssue;

/// Name of the synthetic placeholder used when a return is detected but its
/// source value cannot be resolved
pub const RETURN_PLACEHOLDER: &str = "<return_value>";

/// Wildcard type hint matched by everything
pub const ANY_TYPE: &str = "Any";

/// Where a symbolic value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Parameter,
    Computed,
    Literal,
}

/// A named, typed placeholder representing a parameter or an inferred
/// computed quantity. Created once per distinct named value; never mutated
/// after creation. A later effect that recomputes the same name produces a
/// new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolicValue {
    pub name: String,
    pub type_hint: String,
    pub source: ValueSource,
    /// Human-readable derivation steps, in order
    #[serde(default)]
    pub provenance: Vec<String>,
    /// Index of the effect that produced this value (None for parameters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_index: Option<usize>,
}

impl SymbolicValue {
    /// A value seeded from a declared parameter
    pub fn parameter(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        let name = name.into();
        let provenance = vec![format!("declared as parameter '{name}'")];
        Self {
            name,
            type_hint: type_hint.into(),
            source: ValueSource::Parameter,
            provenance,
            effect_index: None,
        }
    }

    /// A value inferred from an effect clause
    pub fn computed(
        name: impl Into<String>,
        type_hint: impl Into<String>,
        effect_index: usize,
        derivation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_hint: type_hint.into(),
            source: ValueSource::Computed,
            provenance: vec![derivation.into()],
            effect_index: Some(effect_index),
        }
    }

    /// The synthetic placeholder recording that something was returned even
    /// though no named value resolved
    pub fn return_placeholder(effect_index: usize) -> Self {
        Self {
            name: RETURN_PLACEHOLDER.to_string(),
            type_hint: ANY_TYPE.to_string(),
            source: ValueSource::Computed,
            provenance: vec![format!(
                "return detected at effect {effect_index} with unresolved source"
            )],
            effect_index: Some(effect_index),
        }
    }
}

/// Operation tags detected in effect descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Split,
    Join,
    Filter,
    Map,
    Reduce,
    Iterate,
    Count,
    Calculate,
    Check,
    Get,
    Find,
    Return,
    If,
    Else,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Split => "split",
            Operation::Join => "join",
            Operation::Filter => "filter",
            Operation::Map => "map",
            Operation::Reduce => "reduce",
            Operation::Iterate => "iterate",
            Operation::Count => "count",
            Operation::Calculate => "calculate",
            Operation::Check => "check",
            Operation::Get => "get",
            Operation::Find => "find",
            Operation::Return => "return",
            Operation::If => "if",
            Operation::Else => "else",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The symbolic execution trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// Named values, keyed by value name. Insertion order is irrelevant;
    /// a BTreeMap keeps serialized dumps deterministic.
    #[serde(default)]
    pub values: BTreeMap<String, SymbolicValue>,
    /// Detected operations in effect order
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// The resolved return value, if one was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<SymbolicValue>,
    /// Issues found during trace construction
    #[serde(default)]
    pub issues: Vec<SemanticIssue>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value. A name collision replaces the map entry with the new
    /// record (the old record is superseded, not mutated); shadowing of
    /// parameters is reported by the interpreter, not here.
    pub fn insert_value(&mut self, value: SymbolicValue) {
        self.values.insert(value.name.clone(), value);
    }

    pub fn value(&self, name: &str) -> Option<&SymbolicValue> {
        self.values.get(name)
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of all known values
    pub fn value_names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Computed (non-parameter) values, in name order
    pub fn computed_values(&self) -> Vec<&SymbolicValue> {
        self.values
            .values()
            .filter(|v| v.source == ValueSource::Computed)
            .collect()
    }

    pub fn has_operation(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }
}
