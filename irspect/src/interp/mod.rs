//! Interpretation orchestrator
//!
//! Runs the effect-chain analyzer, the semantic validator, and the logic
//! error detectors over one IR, adds its own cross-cutting checks, and merges
//! everything into a single deduplicated result. `interpret` is a pure
//! function of its input: fresh trace per call, no shared state, safe to call
//! concurrently.

use serde::{Deserialize, Serialize};

use crate::analyzer::{self, keywords};
use crate::detector;
use crate::ir::IntermediateRepresentation;
use crate::issue::{Category, SemanticIssue, dedup_issues};
use crate::trace::{ANY_TYPE, ExecutionTrace, Operation, RETURN_PLACEHOLDER};
use crate::util::contains_word;
use crate::validator::{self, ValidationResult};

/// The complete outcome of one `interpret` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationResult {
    pub ir: IntermediateRepresentation,
    pub trace: ExecutionTrace,
    pub validation: ValidationResult,
    /// Deduplicated union of all issues from every pass
    pub issues: Vec<SemanticIssue>,
}

impl InterpretationResult {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.is_warning())
    }

    pub fn errors(&self) -> Vec<&SemanticIssue> {
        self.issues.iter().filter(|i| i.is_error()).collect()
    }

    pub fn warnings(&self) -> Vec<&SemanticIssue> {
        self.issues.iter().filter(|i| i.is_warning()).collect()
    }
}

/// Analyze and validate one IR
pub fn interpret(ir: &IntermediateRepresentation) -> InterpretationResult {
    let trace = analyzer::analyze(ir);
    let validation = validator::validate(ir, &trace);

    let mut issues: Vec<SemanticIssue> = Vec::new();
    issues.extend(trace.issues.iter().cloned());
    issues.extend(validation.issues.iter().cloned());
    issues.extend(detector::detect_all_patterns(ir, &trace));
    issues.extend(check_return_value(ir, &trace));
    issues.extend(check_loop_termination(ir, &trace));
    issues.extend(check_variable_shadowing(ir, &trace));
    issues.extend(check_type_consistency(&trace));
    issues.extend(check_control_flow(ir, &trace));

    InterpretationResult {
        ir: ir.clone(),
        trace,
        validation,
        issues: dedup_issues(issues),
    }
}

/// The sole externally consumed go/no-go decision: warnings never block
pub fn should_generate_code(result: &InterpretationResult) -> bool {
    !result.has_errors()
}

/// An effect explicitly mentions returning, yet nothing resolved. That is a
/// consistency problem in the spec itself, not an abbreviated effect list,
/// so it blocks generation.
fn check_return_value(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
) -> Vec<SemanticIssue> {
    let narrative = ir.effect_text();
    let mentions_return = keywords::has_return_keyword(&narrative);
    let resolved = trace
        .return_value
        .as_ref()
        .is_some_and(|v| v.name != RETURN_PLACEHOLDER);

    if mentions_return && !resolved {
        return vec![
            SemanticIssue::error(
                Category::MissingReturn,
                "an effect mentions returning a value but none could be resolved from \
                 the effect chain",
            )
            .with_suggestion("name the returned value explicitly, e.g. 'Return the count'"),
        ];
    }
    Vec::new()
}

/// Iteration with no termination vocabulary anywhere in the narrative
fn check_loop_termination(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
) -> Vec<SemanticIssue> {
    if !trace.has_operation(Operation::Iterate) {
        return Vec::new();
    }
    let narrative = ir.effect_text();
    if keywords::has_termination_keyword(&narrative) {
        return Vec::new();
    }
    vec![
        SemanticIssue::warning(
            Category::InfiniteLoop,
            "iteration detected but no effect states a termination condition",
        )
        .with_suggestion("state when the loop stops, e.g. 'Iterate until the list is empty'"),
    ]
}

/// A computed value whose name collides with a declared parameter
fn check_variable_shadowing(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
) -> Vec<SemanticIssue> {
    let mut issues = Vec::new();
    for value in trace.computed_values() {
        if ir
            .signature
            .parameters
            .iter()
            .any(|p| p.name == value.name)
        {
            let mut issue = SemanticIssue::warning(
                Category::VariableShadowing,
                format!(
                    "computed value '{}' shadows the parameter of the same name",
                    value.name
                ),
            )
            .with_suggestion(format!("rename the computed value, e.g. 'new_{}'", value.name));
            if let Some(index) = value.effect_index {
                issue = issue.with_effect_index(index);
            }
            issues.push(issue);
        }
    }
    issues
}

/// Spot checks on inferred types: a count must be an int
fn check_type_consistency(trace: &ExecutionTrace) -> Vec<SemanticIssue> {
    let mut issues = Vec::new();
    for value in trace.values.values() {
        let count_like = value.name == "count" || value.name.ends_with("_count");
        if count_like && value.type_hint != "int" && value.type_hint != ANY_TYPE {
            let mut issue = SemanticIssue::error(
                Category::TypeMismatch,
                format!(
                    "value '{}' represents a count but was inferred as '{}'",
                    value.name, value.type_hint
                ),
            );
            if let Some(index) = value.effect_index {
                issue = issue.with_effect_index(index);
            }
            issues.push(issue);
        }
    }
    issues
}

/// Control-flow completeness for conditional narratives
fn check_control_flow(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
) -> Vec<SemanticIssue> {
    let descriptions: Vec<String> = ir
        .effects
        .iter()
        .map(|e| e.description.to_lowercase())
        .collect();

    let has_if = trace.has_operation(Operation::If)
        || descriptions
            .iter()
            .any(|d| contains_word(d, "if") || contains_word(d, "when"));
    let has_else = trace.has_operation(Operation::Else)
        || descriptions
            .iter()
            .any(|d| contains_word(d, "else") || contains_word(d, "otherwise"));
    if !has_if || has_else {
        return Vec::new();
    }

    let returns_in_conditional = descriptions
        .iter()
        .any(|d| keywords::has_return_keyword(d) && keywords::is_conditional(d));
    let returns_anywhere = trace.return_value.is_some()
        || descriptions.iter().any(|d| keywords::has_return_keyword(d));

    let mut issues = Vec::new();
    if !returns_in_conditional {
        issues.push(
            SemanticIssue::warning(
                Category::IncompleteBranch,
                "a conditional effect has no else branch and never returns on the \
                 conditional path",
            )
            .with_suggestion("state what happens when the condition does not hold"),
        );
    }
    if ir.signature.returns.is_some() && returns_anywhere {
        issues.push(
            SemanticIssue::error(
                Category::MissingReturnPath,
                "signature declares a return type but not every conditional path \
                 provably returns a value",
            )
            .with_suggestion("add an else branch, or return a default after the conditional"),
        );
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Intent, Signature};
    use crate::issue::Severity;

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
    fn test_interpret_is_deterministic() {
        let ir = word_count_ir();
        let a = interpret(&ir);
        let b = interpret(&ir);
        assert_eq!(a.issues, b.issues);
        assert_eq!(a.trace, b.trace);
    }

    #[test]
    fn test_clean_ir_generates() {
        let result = interpret(&word_count_ir());
        assert!(!result.has_errors());
        assert!(should_generate_code(&result));
    }

    #[test]
    fn test_issues_are_deduplicated() {
        let ir = word_count_ir();
        let result = interpret(&ir);
        for (i, a) in result.issues.iter().enumerate() {
            for b in &result.issues[i + 1..] {
                assert_ne!(a.dedup_key(), b.dedup_key());
            }
        }
    }

    #[test]
    fn test_unresolved_explicit_return_is_error() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Do math"),
            Signature::new("f").with_returns("int"),
        )
        .with_effect("Multiply x by 2")
        .with_effect("Return the result");
        let result = interpret(&ir);
        assert!(result.has_errors());
        assert!(
            result
                .errors()
                .iter()
                .any(|i| i.category == Category::MissingReturn)
        );
        assert!(!should_generate_code(&result));
    }

    #[test]
    fn test_iteration_without_termination_warns() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Walk a structure"),
            Signature::new("walk"),
        )
        .with_effect("Traverse the tree")
        .with_effect("Record every node");
        let result = interpret(&ir);
        assert!(
            result
                .warnings()
                .iter()
                .any(|i| i.category == Category::InfiniteLoop)
        );
    }

    #[test]
    fn test_iteration_with_termination_is_quiet() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Drain a queue"),
            Signature::new("drain"),
        )
        .with_effect("Iterate until the queue is empty");
        let result = interpret(&ir);
        assert!(
            !result
                .issues
                .iter()
                .any(|i| i.category == Category::InfiniteLoop)
        );
    }

    #[test]
    fn test_shadowing_parameter_warns() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Recount things"),
            Signature::new("recount").with_param("count", "int"),
        )
        .with_effect("Count the entries");
        let result = interpret(&ir);
        assert!(
            result
                .warnings()
                .iter()
                .any(|i| i.category == Category::VariableShadowing)
        );
    }

    #[test]
    fn test_count_typed_as_non_int_is_error() {
        use crate::trace::SymbolicValue;
        let mut trace = ExecutionTrace::new();
        trace.insert_value(SymbolicValue::computed("line_count", "str", 0, "mis-typed"));
        let issues = check_type_consistency(&trace);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].category, Category::TypeMismatch);
    }

    #[test]
    fn test_if_without_else_or_return_warns() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Filter entries"),
            Signature::new("filter_entries"),
        )
        .with_effect("Iterate over the entries")
        .with_effect("If the entry is empty, skip it")
        .with_effect("Collect the entry into kept_entries");
        let result = interpret(&ir);
        assert!(
            result
                .warnings()
                .iter()
                .any(|i| i.category == Category::IncompleteBranch)
        );
    }

    #[test]
    fn test_if_without_else_with_declared_return_is_error() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Classify input"),
            Signature::new("classify").with_param("x", "int").with_returns("str"),
        )
        .with_effect("If x is negative, return the label")
        .with_effect("Compute the label into label");
        let result = interpret(&ir);
        assert!(
            result
                .errors()
                .iter()
                .any(|i| i.category == Category::MissingReturnPath)
        );
    }

    #[test]
    fn test_result_carries_trace_and_validation() {
        let result = interpret(&word_count_ir());
        assert!(result.trace.has_value("count"));
        assert!(result.validation.passed);
        assert_eq!(result.trace.return_value.as_ref().map(|v| v.name.as_str()), Some("count"));
    }

    #[test]
    fn test_warnings_never_block_generation() {
        let ir = IntermediateRepresentation::new(
            Intent::new("Walk a structure"),
            Signature::new("walk"),
        )
        .with_effect("Traverse the tree");
        let result = interpret(&ir);
        assert!(result.has_warnings());
        assert_eq!(
            should_generate_code(&result),
            !result.issues.iter().any(|i| i.severity == Severity::Error)
        );
    }
}
