//! Semantic validation
//!
//! Structural consistency checks over the IR and its execution trace: return
//! type compatibility, parameter usage, assertion coverage, and the
//! parameter-uniqueness invariant. All checks are advisory-or-error pure data;
//! nothing here can fail.

use serde::{Deserialize, Serialize};

use crate::ir::IntermediateRepresentation;
use crate::issue::{Category, SemanticIssue};
use crate::trace::{ANY_TYPE, ExecutionTrace, RETURN_PLACEHOLDER};
use crate::util::{contains_word, tokenize_words};

/// Vocabulary treated as a reference to "the result" in assertion predicates
const RESULT_VOCABULARY: &[&str] = &["result", "output", "return", "computed", "calculated"];

/// Type-associated synonyms accepted as evidence that a parameter is used
const TYPE_USAGE_SYNONYMS: &[(&str, &[&str])] = &[
    ("str", &["string", "text", "word", "characters", "sentence"]),
    ("int", &["number", "integer", "count", "value"]),
    ("float", &["number", "decimal", "value"]),
    ("bool", &["flag", "condition", "boolean"]),
    ("list", &["list", "items", "elements", "array", "collection"]),
    ("dict", &["dictionary", "mapping", "keys", "entries"]),
];

/// Outcome of the validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub issues: Vec<SemanticIssue>,
}

impl ValidationResult {
    pub fn errors(&self) -> Vec<&SemanticIssue> {
        self.issues.iter().filter(|i| i.is_error()).collect()
    }

    pub fn warnings(&self) -> Vec<&SemanticIssue> {
        self.issues.iter().filter(|i| i.is_warning()).collect()
    }
}

/// Validate the IR against its execution trace
pub fn validate(ir: &IntermediateRepresentation, trace: &ExecutionTrace) -> ValidationResult {
    let mut issues = Vec::new();

    check_duplicate_parameters(ir, &mut issues);
    check_return_consistency(ir, trace, &mut issues);
    check_parameter_usage(ir, &mut issues);
    check_assertion_coverage(ir, trace, &mut issues);

    let passed = !issues.iter().any(|i| i.is_error());
    ValidationResult { passed, issues }
}

/// Type-compatibility relation between two type hints.
/// Deliberately permissive: this pass is advisory.
pub fn types_compatible(expected: &str, actual: &str) -> bool {
    let expected = expected.trim().to_lowercase();
    let actual = actual.trim().to_lowercase();
    let any = ANY_TYPE.to_lowercase();

    if expected == actual {
        return true;
    }
    if expected.is_empty() || actual.is_empty() || expected == any || actual == any {
        return true;
    }
    if expected.starts_with("list") && actual.starts_with("list") {
        return true;
    }
    if expected.starts_with("dict") && actual.starts_with("dict") {
        return true;
    }
    if (expected == "float" || expected == "number") && actual == "int" {
        return true;
    }
    false
}

/// Invariant: parameter names are unique within one signature
fn check_duplicate_parameters(ir: &IntermediateRepresentation, issues: &mut Vec<SemanticIssue>) {
    let mut seen: Vec<&str> = Vec::new();
    for param in &ir.signature.parameters {
        if seen.contains(&param.name.as_str()) {
            issues.push(SemanticIssue::error(
                Category::DuplicateParameter,
                format!(
                    "parameter '{}' is declared more than once in '{}'",
                    param.name, ir.signature.name
                ),
            ));
        } else {
            seen.push(&param.name);
        }
    }
}

/// Declared return type vs the type of the resolved return value
fn check_return_consistency(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
    issues: &mut Vec<SemanticIssue>,
) {
    let (Some(declared), Some(returned)) = (&ir.signature.returns, &trace.return_value) else {
        return;
    };
    if returned.name == RETURN_PLACEHOLDER {
        // Placeholder carries no type evidence either way
        return;
    }
    if !types_compatible(declared, &returned.type_hint) {
        let mut issue = SemanticIssue::warning(
            Category::TypeMismatch,
            format!(
                "signature declares return type '{declared}' but '{}' was inferred as '{}'",
                returned.name, returned.type_hint
            ),
        );
        if let Some(index) = returned.effect_index {
            issue = issue.with_effect_index(index);
        }
        issues.push(issue);
    }
}

/// Each declared parameter should be mentioned by name, or via a synonym of
/// its type, somewhere in the effect narrative
fn check_parameter_usage(ir: &IntermediateRepresentation, issues: &mut Vec<SemanticIssue>) {
    let narrative = ir.effect_text();
    if narrative.is_empty() {
        return;
    }

    for param in &ir.signature.parameters {
        let named = contains_word(&narrative, &param.name.to_lowercase());
        let via_synonym = type_synonyms(&param.type_hint)
            .iter()
            .any(|syn| contains_word(&narrative, syn));
        if !named && !via_synonym {
            issues.push(
                SemanticIssue::warning(
                    Category::UnusedParameter,
                    format!("parameter '{}' is never referenced by any effect", param.name),
                )
                .with_suggestion(format!(
                    "mention '{}' in an effect or remove it from the signature",
                    param.name
                )),
            );
        }
    }
}

fn type_synonyms(type_hint: &str) -> &'static [&'static str] {
    let normalized = type_hint.trim().to_lowercase();
    for (ty, synonyms) in TYPE_USAGE_SYNONYMS {
        if normalized.starts_with(ty) {
            return synonyms;
        }
    }
    &[]
}

/// Each assertion should reference something the trace knows about
fn check_assertion_coverage(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
    issues: &mut Vec<SemanticIssue>,
) {
    for assertion in &ir.assertions {
        let tokens = tokenize_words(&assertion.predicate);

        let names_value = tokens
            .iter()
            .any(|tok| trace.has_value(tok) || ir.signature.parameters.iter().any(|p| p.name.to_lowercase() == *tok));
        let references_return = trace.return_value.is_some()
            && tokens
                .iter()
                .any(|tok| tok == "result" || tok == "output" || tok == "return");

        if names_value || references_return {
            continue;
        }

        let mentions_result_vocab = tokens
            .iter()
            .any(|tok| RESULT_VOCABULARY.contains(&tok.as_str()));
        if mentions_result_vocab {
            issues.push(
                SemanticIssue::warning(
                    Category::AssertionCoverage,
                    format!(
                        "assertion '{}' refers to a result no effect produces",
                        assertion.predicate
                    ),
                )
                .with_suggestion(
                    "add an effect that computes and returns the asserted result".to_string(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::ir::{Intent, Signature};

    fn word_count_ir() -> IntermediateRepresentation {
        IntermediateRepresentation::new(
            Intent::new("Count words in text"),
            Signature::new("count_words")
                .with_param("text", "str")
                .with_returns("int"),
        )
        .with_effect("Split the text by spaces into words")
        .with_effect("Count the words")
        .with_effect("Return the count")
    }

    #[test]
    fn test_clean_ir_passes() {
        let ir = word_count_ir();
        let trace = analyze(&ir);
        let result = validate(&ir, &trace);
        assert!(result.passed);
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_types_compatible_relation() {
        assert!(types_compatible("int", "int"));
        assert!(types_compatible("Any", "str"));
        assert!(types_compatible("list[str]", "list[int]"));
        assert!(types_compatible("dict[str, int]", "dict"));
        assert!(types_compatible("float", "int"));
        assert!(types_compatible("number", "int"));
        assert!(!types_compatible("int", "str"));
        assert!(!types_compatible("int", "float"));
    }

    #[test]
    fn test_return_type_mismatch_is_warning() {
        let mut ir = word_count_ir();
        ir.signature.returns = Some("str".to_string());
        let trace = analyze(&ir);
        let result = validate(&ir, &trace);
        let issue = result
            .issues
            .iter()
            .find(|i| i.category == Category::TypeMismatch)
            .expect("type mismatch reported");
        assert!(issue.is_warning());
        assert!(result.passed);
    }

    #[test]
    fn test_unused_parameter_detected() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Do a thing"),
            Signature::new("f")
                .with_param("payload", "CustomRecord")
                .with_returns("int"),
        )
        .with_effect("Count the rows")
        .with_effect("Return the count");
        let trace = analyze(&ir);
        let result = validate(&ir, &trace);
        assert!(
            result
                .issues
                .iter()
                .any(|i| i.category == Category::UnusedParameter
                    && i.message.contains("payload"))
        );
    }

    #[test]
    fn test_parameter_used_via_type_synonym() {
        // "text" never names the parameter but is a `str` synonym
        let ir = IntermediateRepresentation::new(
            Intent::new("Normalize"),
            Signature::new("normalize").with_param("raw", "str"),
        )
        .with_effect("Strip whitespace from the text");
        let trace = analyze(&ir);
        let result = validate(&ir, &trace);
        assert!(
            !result
                .issues
                .iter()
                .any(|i| i.category == Category::UnusedParameter)
        );
    }

    #[test]
    fn test_duplicate_parameter_is_error() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Add"),
            Signature::new("add")
                .with_param("x", "int")
                .with_param("x", "int"),
        )
        .with_effect("Add x to x");
        let trace = analyze(&ir);
        let result = validate(&ir, &trace);
        assert!(!result.passed);
        assert!(
            result
                .errors()
                .iter()
                .any(|i| i.category == Category::DuplicateParameter)
        );
    }

    #[test]
    fn test_assertion_covering_known_value_is_quiet() {
        let ir = word_count_ir().with_assertion("count >= 0");
        let trace = analyze(&ir);
        let result = validate(&ir, &trace);
        assert!(
            !result
                .issues
                .iter()
                .any(|i| i.category == Category::AssertionCoverage)
        );
    }

    #[test]
    fn test_assertion_about_phantom_result_warns() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Mystery"),
            Signature::new("mystery"),
        )
        .with_effect("Log a message")
        .with_assertion("the result is sorted");
        let trace = analyze(&ir);
        let result = validate(&ir, &trace);
        assert!(
            result
                .issues
                .iter()
                .any(|i| i.category == Category::AssertionCoverage)
        );
    }
}
