//! Effect-chain analysis
//!
//! Symbolic execution over the IR's natural-language effect clauses. The
//! analyzer seeds one symbolic value per declared parameter, then walks the
//! effects in order, detecting operations, resolving what (if anything) is
//! returned, and inferring computed values from a fixed priority order of
//! extraction rules. It never fails: unparseable input degrades to a sparse
//! trace plus issues.

pub mod keywords;

use crate::ir::IntermediateRepresentation;
use crate::issue::{Category, SemanticIssue};
use crate::trace::{ExecutionTrace, RETURN_PLACEHOLDER, SymbolicValue, ValueSource};
use crate::util::{find_similar_name, format_suggestion_hint};

use keywords::{
    CALCULATE_RE, COUNT_RE, FIND_RE, INTO_RE, RETURN_IDENT_RE, TAKE_PARAM_RE, detect_operation,
    has_return_keyword, infer_type, literal_type, name_from_phrase,
};

/// Build the symbolic execution trace for one IR
pub fn analyze(ir: &IntermediateRepresentation) -> ExecutionTrace {
    let mut trace = ExecutionTrace::new();

    for param in &ir.signature.parameters {
        trace.insert_value(SymbolicValue::parameter(&param.name, &param.type_hint));
    }

    for (index, effect) in ir.effects.iter().enumerate() {
        let description = effect.description.trim().to_lowercase();
        if description.is_empty() {
            trace.issues.push(
                SemanticIssue::warning(
                    Category::InvalidLogic,
                    format!("effect {index} has an empty description"),
                )
                .with_effect_index(index),
            );
            continue;
        }

        if let Some(op) = detect_operation(&description) {
            trace.operations.push(op);
        }

        if has_return_keyword(&description) {
            resolve_return(&mut trace, &description, index);
        } else if let Some(value) = extract_produced_value(&description, index) {
            trace.insert_value(value);
        }
    }

    check_missing_return(ir, &mut trace);
    trace
}

/// Resolve what an effect with a return keyword actually returns.
/// A resolved return value is never overwritten; if no identifier resolves, a
/// synthetic placeholder records the detection, and a later effect that does
/// resolve may upgrade the placeholder.
fn resolve_return(trace: &mut ExecutionTrace, description: &str, index: usize) {
    let resolved_already = trace
        .return_value
        .as_ref()
        .is_some_and(|v| v.name != RETURN_PLACEHOLDER);
    if resolved_already {
        return;
    }

    if let Some(caps) = RETURN_IDENT_RE.captures(description) {
        let ident = caps.get(1).map_or("", |m| m.as_str());

        if let Some(known) = trace.value(ident) {
            let mut returned = known.clone();
            returned.provenance.push(format!("returned at effect {index}"));
            trace.return_value = Some(returned);
            return;
        }

        if let Some(ty) = literal_type(ident) {
            let mut literal = SymbolicValue::computed(
                ident,
                ty,
                index,
                format!("literal '{ident}' returned at effect {index}"),
            );
            literal.source = ValueSource::Literal;
            trace.return_value = Some(literal);
            return;
        }

        let names = trace.value_names();
        let mut issue = SemanticIssue::warning(
            Category::UndefinedVariable,
            format!("effect returns '{ident}' but no such value is known"),
        )
        .with_effect_index(index);
        if let Some(similar) = find_similar_name(ident, &names, 2) {
            issue = issue.with_suggestion(format_suggestion_hint(Some(similar)));
        }
        trace.issues.push(issue);
    }

    if trace.return_value.is_none() {
        trace.return_value = Some(SymbolicValue::return_placeholder(index));
    }
}

/// Extract a produced value from an effect description.
/// Rules are tried in fixed priority order; the first match consumes the effect.
fn extract_produced_value(description: &str, index: usize) -> Option<SymbolicValue> {
    // "... into <name>"
    if let Some(caps) = INTO_RE.captures(description) {
        if let Some(name) = name_from_phrase(caps.get(1).map_or("", |m| m.as_str())) {
            let ty = infer_type(description, &name);
            return Some(SymbolicValue::computed(
                &name,
                ty,
                index,
                format!("produced by effect {index}: {description}"),
            ));
        }
    }

    // "take/get the parameter <name>"
    if let Some(caps) = TAKE_PARAM_RE.captures(description) {
        let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let ty = infer_type(description, &name);
        return Some(SymbolicValue::computed(
            &name,
            ty,
            index,
            format!("bound from input at effect {index}"),
        ));
    }

    // "count the ..." always yields an int named `count`
    if COUNT_RE.is_match(description) {
        return Some(SymbolicValue::computed(
            "count",
            "int",
            index,
            format!("count computed at effect {index}: {description}"),
        ));
    }

    // "find the ... index/value/position"
    if let Some(caps) = FIND_RE.captures(description) {
        let (name, ty) = match caps.get(1).map_or("", |m| m.as_str()) {
            "value" => ("value", infer_type(description, "value")),
            _ => ("index", "int".to_string()),
        };
        return Some(SymbolicValue::computed(
            name,
            ty,
            index,
            format!("found at effect {index}: {description}"),
        ));
    }

    // "calculate/compute ..." yields a generic `result`
    if CALCULATE_RE.is_match(description) {
        let ty = infer_type(description, "result");
        return Some(SymbolicValue::computed(
            "result",
            ty,
            index,
            format!("calculated at effect {index}: {description}"),
        ));
    }

    None
}

/// Trailing check: declared return type without any resolved return value
fn check_missing_return(ir: &IntermediateRepresentation, trace: &mut ExecutionTrace) {
    let Some(returns) = &ir.signature.returns else {
        return;
    };
    if trace.return_value.is_some() {
        return;
    }

    // Warning either way: effect lists are often intentionally abbreviated.
    let mut issue = SemanticIssue::warning(
        Category::MissingReturn,
        format!("signature declares return type '{returns}' but no effect returns a value"),
    );
    let candidate = trace
        .computed_values()
        .into_iter()
        .max_by_key(|v| v.effect_index);
    if let Some(value) = candidate {
        issue = issue.with_suggestion(format!(
            "add a final effect returning '{}' (inferred {})",
            value.name, value.type_hint
        ));
    }
    trace.issues.push(issue);
}
