//! Logic error pattern detection
//!
//! Independent detectors for known bug shapes in effect narratives: first/last
//! loop confusion, incomplete validation predicates, and unreachable code
//! after an unconditional return. Each detector is pure and order-independent;
//! `detect_all_patterns` is just their concatenation.

use crate::analyzer::keywords::{has_return_keyword, is_conditional};
use crate::ir::IntermediateRepresentation;
use crate::issue::{Category, SemanticIssue};
use crate::trace::{ExecutionTrace, Operation};
use crate::util::contains_word;

/// Validation verbs that gate the incomplete-validation detector
const VALIDATION_VERBS: &[&str] = &["valid", "validate", "check", "verify", "ensure"];

/// Run every pattern detector and collect their findings
pub fn detect_all_patterns(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
) -> Vec<SemanticIssue> {
    let mut issues = Vec::new();
    issues.extend(detect_off_by_one(ir, trace));
    issues.extend(detect_incomplete_validation(ir));
    issues.extend(detect_unreachable_code(ir));
    issues
}

/// First/last loop confusion.
///
/// Asking for the "first" match while iterating without an immediate
/// conditional return usually yields the last match (each hit overwrites the
/// previous one). Symmetrically, asking for the "last" match while returning
/// immediately on a condition yields the first.
pub fn detect_off_by_one(
    ir: &IntermediateRepresentation,
    trace: &ExecutionTrace,
) -> Vec<SemanticIssue> {
    let mut issues = Vec::new();
    let intent = ir.intent.summary.to_lowercase();
    let descriptions: Vec<String> = ir
        .effects
        .iter()
        .map(|e| e.description.to_lowercase())
        .collect();

    let iterates = trace.has_operation(Operation::Iterate)
        || descriptions.iter().any(|d| {
            contains_word(d, "enumerate")
                || contains_word(d, "iterate")
                || contains_word(d, "loop")
        });
    let returns_immediately = descriptions.iter().any(|d| {
        has_return_keyword(d)
            && (contains_word(d, "when")
                || contains_word(d, "if")
                || contains_word(d, "immediately"))
    });

    if contains_word(&intent, "first") && iterates && !returns_immediately {
        issues.push(
            SemanticIssue::warning(
                Category::OffByOne,
                "intent asks for the first match but the loop never returns on a hit; \
                 the last match may be returned instead",
            )
            .with_suggestion("return as soon as the condition matches inside the loop"),
        );
    }

    if contains_word(&intent, "last") && returns_immediately {
        issues.push(
            SemanticIssue::warning(
                Category::OffByOne,
                "intent asks for the last match but an effect returns immediately on a \
                 condition; the first match may be returned instead",
            )
            .with_suggestion("track the latest match and return it after the loop finishes"),
        );
    }

    issues
}

/// Incomplete validation predicates for well-known input shapes.
///
/// Only triggers when the intent reads as validation. The email dot-after-@
/// ordering check is keyword co-occurrence, not structural parsing; it is
/// best-effort and may both over- and under-trigger.
pub fn detect_incomplete_validation(ir: &IntermediateRepresentation) -> Vec<SemanticIssue> {
    let intent = ir.intent.summary.to_lowercase();
    if !VALIDATION_VERBS.iter().any(|v| contains_word(&intent, v)) {
        return Vec::new();
    }

    let narrative = ir.effect_text();
    let mut issues = Vec::new();

    if contains_word(&intent, "email") {
        issues.extend(check_email_validation(&narrative));
    }

    if contains_word(&intent, "phone") {
        let checks_digits = contains_word(&narrative, "digit")
            || contains_word(&narrative, "digits")
            || contains_word(&narrative, "numeric");
        let checks_length = contains_word(&narrative, "length")
            || contains_word(&narrative, "characters")
            || narrative.contains("at least")
            || narrative.contains("exactly");
        if !checks_digits && !checks_length {
            issues.push(
                SemanticIssue::warning(
                    Category::InvalidLogic,
                    "phone validation never checks digits or length",
                )
                .with_suggestion("add an effect like 'Check that the input has 10 digits'"),
            );
        }
    }

    if contains_word(&intent, "password") {
        let checks_length = contains_word(&narrative, "length")
            || contains_word(&narrative, "characters")
            || narrative.contains("at least");
        if !checks_length {
            issues.push(
                SemanticIssue::warning(
                    Category::InvalidLogic,
                    "password validation never checks a minimum length",
                )
                .with_suggestion(
                    "add an effect like 'Check that the password is at least 8 characters long'",
                ),
            );
        }
    }

    issues
}

fn check_email_validation(narrative: &str) -> Vec<SemanticIssue> {
    let checks_at = narrative.contains('@') || narrative.contains("at sign");
    let checks_dot = narrative.contains('.')
        || contains_word(narrative, "dot")
        || contains_word(narrative, "period");
    let checks_order = contains_word(narrative, "after")
        || contains_word(narrative, "follows")
        || contains_word(narrative, "before")
        || contains_word(narrative, "domain");

    let mut issues = Vec::new();
    match (checks_at, checks_dot) {
        (true, true) if !checks_order => {
            issues.push(
                SemanticIssue::warning(
                    Category::InvalidLogic,
                    "email validation checks '@' and '.' but never that the '.' comes \
                     after the '@'; 'a.b@c' would pass",
                )
                .with_suggestion("add an effect like 'Check that the last . comes after the @'"),
            );
        }
        (true, false) => {
            issues.push(
                SemanticIssue::error(
                    Category::InvalidLogic,
                    "email validation checks '@' but never checks for a '.' in the domain",
                )
                .with_suggestion("add an effect like 'Check that a . appears after the @'"),
            );
        }
        (false, true) => {
            issues.push(
                SemanticIssue::error(
                    Category::InvalidLogic,
                    "email validation checks '.' but never checks for an '@'",
                )
                .with_suggestion("add an effect like 'Check that the email contains an @'"),
            );
        }
        (false, false) => {
            issues.push(
                SemanticIssue::error(
                    Category::InvalidLogic,
                    "email validation never checks the '@' or '.' structure",
                )
                .with_suggestion(
                    "add effects checking for '@', for '.', and that the '.' comes after the '@'",
                ),
            );
        }
        _ => {}
    }
    issues
}

/// Effects after the first unconditional return can never execute
pub fn detect_unreachable_code(ir: &IntermediateRepresentation) -> Vec<SemanticIssue> {
    for (index, effect) in ir.effects.iter().enumerate() {
        let description = effect.description.to_lowercase();
        if !has_return_keyword(&description) || is_conditional(&description) {
            continue;
        }
        let trailing = ir.effects.len() - index - 1;
        if trailing > 0 {
            return vec![
                SemanticIssue::warning(
                    Category::UnreachableCode,
                    format!(
                        "{trailing} effect(s) after the unconditional return at effect \
                         {index} can never execute"
                    ),
                )
                .with_effect_index(index)
                .with_suggestion(
                    "move the trailing effects before the return or make the return conditional",
                ),
            ];
        }
        break;
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::ir::{Intent, Signature};

    fn ir(intent: &str, effects: &[&str]) -> IntermediateRepresentation {
        let mut ir =
            IntermediateRepresentation::new(Intent::new(intent), Signature::new("f"));
        for e in effects {
            ir = ir.with_effect(*e);
        }
        ir
    }

    fn detect(intent: &str, effects: &[&str]) -> Vec<SemanticIssue> {
        let ir = ir(intent, effects);
        let trace = analyze(&ir);
        detect_all_patterns(&ir, &trace)
    }

    #[test]
    fn test_first_without_immediate_return_warns() {
        let issues = detect(
            "Find FIRST index of value",
            &[
                "Use enumerate to iterate",
                "Check if item equals target",
                "Store the index",
            ],
        );
        assert!(issues.iter().any(|i| i.category == Category::OffByOne));
    }

    #[test]
    fn test_first_with_immediate_return_is_quiet() {
        let issues = detect(
            "Find the first matching index",
            &[
                "Iterate over the items",
                "Return the index when the item equals the target",
            ],
        );
        assert!(!issues.iter().any(|i| i.category == Category::OffByOne));
    }

    #[test]
    fn test_last_with_immediate_return_warns() {
        let issues = detect(
            "Find the last occurrence",
            &[
                "Loop over the entries",
                "Return the index if the entry matches",
            ],
        );
        assert!(issues.iter().any(|i| i.category == Category::OffByOne));
    }

    #[test]
    fn test_email_missing_ordering_check() {
        let issues = detect(
            "Check if string is a valid email address",
            &[
                "Check if email contains @ symbol",
                "Check if email contains . dot",
                "Return True if both checks pass",
            ],
        );
        let issue = issues
            .iter()
            .find(|i| i.category == Category::InvalidLogic)
            .expect("ordering issue");
        assert!(issue.is_warning());
        assert!(issue.message.contains("after"));
    }

    #[test]
    fn test_email_missing_dot_check_is_error() {
        let issues = detect(
            "Validate an email address",
            &["Check if the input contains @", "Return True if it does"],
        );
        assert!(
            issues
                .iter()
                .any(|i| i.category == Category::InvalidLogic && i.is_error())
        );
    }

    #[test]
    fn test_email_with_ordering_check_is_quiet() {
        let issues = detect(
            "Validate an email address",
            &[
                "Check if the input contains @",
                "Check that the last . comes after the @",
                "Return True if both hold",
            ],
        );
        assert!(!issues.iter().any(|i| i.category == Category::InvalidLogic));
    }

    #[test]
    fn test_validation_detector_gated_on_intent() {
        // No validation verb in the intent: the detector must stay silent
        // even though the narrative mentions an email
        let issues = detect("Send a welcome email", &["Send the email to the address"]);
        assert!(!issues.iter().any(|i| i.category == Category::InvalidLogic));
    }

    #[test]
    fn test_phone_validation_without_digit_check() {
        let issues = detect(
            "Validate a phone number",
            &["Strip spaces from the input", "Return True"],
        );
        assert!(
            issues
                .iter()
                .any(|i| i.category == Category::InvalidLogic
                    && i.message.contains("phone"))
        );
    }

    #[test]
    fn test_password_validation_without_length_check() {
        let issues = detect(
            "Check that a password is strong",
            &["Check for an uppercase letter", "Return True if present"],
        );
        assert!(
            issues
                .iter()
                .any(|i| i.category == Category::InvalidLogic
                    && i.message.contains("password"))
        );
    }

    #[test]
    fn test_unreachable_after_unconditional_return() {
        let issues = detect(
            "Double a number",
            &[
                "Multiply x by 2",
                "Return the result",
                "Add 10 to result",
                "Return modified result",
            ],
        );
        let issue = issues
            .iter()
            .find(|i| i.category == Category::UnreachableCode)
            .expect("unreachable code");
        assert_eq!(issue.effect_index, Some(1));
    }

    #[test]
    fn test_conditional_return_does_not_cut_flow() {
        let issues = detect(
            "Classify a number",
            &[
                "Return 'negative' if x is below zero",
                "Return 'positive'",
            ],
        );
        assert!(!issues.iter().any(|i| i.category == Category::UnreachableCode));
    }
}
