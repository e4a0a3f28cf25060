//! Intermediate Representation definitions
//!
//! The IR is the structured specification of an intended function: its stated
//! intent, signature, an ordered list of natural-language effect descriptions,
//! and a list of assertions. It is produced upstream (prompt-to-spec pipeline,
//! code-to-spec lifter, or session workflow) and is immutable for the duration
//! of one validation call.

use serde::{Deserialize, Serialize};

/// An explicitly unresolved placeholder within intent/signature/effects/assertions.
/// Holes are consumed and produced outside this crate; the validator treats
/// them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedHole {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The stated purpose of the intended function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default)]
    pub holes: Vec<TypedHole>,
}

impl Intent {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            rationale: None,
            holes: Vec::new(),
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: type_hint.into(),
            description: None,
        }
    }
}

/// Function signature
///
/// Invariant: parameter names are unique within one signature. A violation is
/// surfaced as a `duplicate_parameter` issue during validation, never a panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(default)]
    pub holes: Vec<TypedHole>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns: None,
            holes: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, type_hint));
        self
    }

    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }
}

/// One natural-language sentence describing a single operational step of the
/// intended function. The `effects` list is ordered: clause order is
/// execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectClause {
    pub description: String,
    #[serde(default)]
    pub holes: Vec<TypedHole>,
}

impl EffectClause {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            holes: Vec::new(),
        }
    }
}

/// A claimed property of the intended function, as a natural-language predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertClause {
    pub predicate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default)]
    pub holes: Vec<TypedHole>,
}

impl AssertClause {
    pub fn new(predicate: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            rationale: None,
            holes: Vec::new(),
        }
    }
}

/// Provenance of the IR. Read-only context carried through unchanged; this
/// crate never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// The structured specification validated by this crate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateRepresentation {
    #[serde(default)]
    pub intent: Intent,
    #[serde(default)]
    pub signature: Signature,
    #[serde(default)]
    pub effects: Vec<EffectClause>,
    #[serde(default)]
    pub assertions: Vec<AssertClause>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl IntermediateRepresentation {
    pub fn new(intent: Intent, signature: Signature) -> Self {
        Self {
            intent,
            signature,
            effects: Vec::new(),
            assertions: Vec::new(),
            metadata: Metadata::default(),
        }
    }

    pub fn with_effect(mut self, description: impl Into<String>) -> Self {
        self.effects.push(EffectClause::new(description));
        self
    }

    pub fn with_assertion(mut self, predicate: impl Into<String>) -> Self {
        self.assertions.push(AssertClause::new(predicate));
        self
    }

    /// All effect descriptions joined with newlines, lower-cased.
    /// Several checks match keywords against the whole narrative at once.
    pub fn effect_text(&self) -> String {
        self.effects
            .iter()
            .map(|e| e.description.to_lowercase())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_produces_ordered_effects() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Count words"),
            Signature::new("count_words").with_param("text", "str").with_returns("int"),
        )
        .with_effect("Split text by spaces into words")
        .with_effect("Count the words")
        .with_effect("Return the count");

        assert_eq!(ir.effects.len(), 3);
        assert_eq!(ir.effects[0].description, "Split text by spaces into words");
        assert_eq!(ir.effects[2].description, "Return the count");
    }

    #[test]
    fn test_sparse_json_deserializes_to_empty_collections() {
        let ir: IntermediateRepresentation = serde_json::from_str(
            r#"{"intent": {"summary": "Do nothing"}, "signature": {"name": "noop"}}"#,
        )
        .expect("sparse IR should deserialize");

        assert!(ir.effects.is_empty());
        assert!(ir.assertions.is_empty());
        assert!(ir.signature.parameters.is_empty());
        assert!(ir.signature.returns.is_none());
    }

    #[test]
    fn test_effect_text_is_lowercased_narrative() {
        let ir = IntermediateRepresentation::new(Intent::new("x"), Signature::new("f"))
            .with_effect("Split THE input")
            .with_effect("Return the RESULT");

        assert_eq!(ir.effect_text(), "split the input\nreturn the result");
    }
}
