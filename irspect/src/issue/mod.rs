//! Semantic issues
//!
//! An issue is a single detected defect or risk. Issues are pure data,
//! comparable by `(category, message)` for deduplication; the core never
//! raises during normal operation, it accumulates these instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue severity. `Error` blocks downstream code generation, `Warning` is
/// advisory and never blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Fixed vocabulary of issue categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MissingReturn,
    OffByOne,
    InvalidLogic,
    UnreachableCode,
    TypeMismatch,
    UnusedParameter,
    VariableShadowing,
    UndefinedVariable,
    IncompleteBranch,
    MissingReturnPath,
    AssertionCoverage,
    InfiniteLoop,
    DuplicateParameter,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MissingReturn => "missing_return",
            Category::OffByOne => "off_by_one",
            Category::InvalidLogic => "invalid_logic",
            Category::UnreachableCode => "unreachable_code",
            Category::TypeMismatch => "type_mismatch",
            Category::UnusedParameter => "unused_parameter",
            Category::VariableShadowing => "variable_shadowing",
            Category::UndefinedVariable => "undefined_variable",
            Category::IncompleteBranch => "incomplete_branch",
            Category::MissingReturnPath => "missing_return_path",
            Category::AssertionCoverage => "assertion_coverage",
            Category::InfiniteLoop => "infinite_loop",
            Category::DuplicateParameter => "duplicate_parameter",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected defect or risk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticIssue {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    /// Index into `effects` of the clause that triggered the issue, when one did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_index: Option<usize>,
    /// Concrete remediation hint, when one can be named
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SemanticIssue {
    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            effect_index: None,
            suggestion: None,
        }
    }

    pub fn warning(category: Category, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            category,
            message: message.into(),
            effect_index: None,
            suggestion: None,
        }
    }

    pub fn with_effect_index(mut self, index: usize) -> Self {
        self.effect_index = Some(index);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Identity for deduplication across issue sources
    pub fn dedup_key(&self) -> (Category, &str) {
        (self.category, &self.message)
    }
}

impl fmt::Display for SemanticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.category, self.message)?;
        if let Some(idx) = self.effect_index {
            write!(f, " (effect {idx})")?;
        }
        Ok(())
    }
}

/// Remove duplicate issues by `(category, message)`, keeping first-seen order
pub fn dedup_issues(issues: Vec<SemanticIssue>) -> Vec<SemanticIssue> {
    let mut seen: Vec<(Category, String)> = Vec::new();
    let mut out = Vec::with_capacity(issues.len());
    for issue in issues {
        let key = (issue.category, issue.message.clone());
        if !seen.contains(&key) {
            seen.push(key);
            out.push(issue);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_tags() {
        assert_eq!(Category::MissingReturn.as_str(), "missing_return");
        assert_eq!(Category::OffByOne.as_str(), "off_by_one");
        assert_eq!(Category::UnreachableCode.as_str(), "unreachable_code");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let issues = vec![
            SemanticIssue::warning(Category::MissingReturn, "no return").with_effect_index(1),
            SemanticIssue::error(Category::TypeMismatch, "int vs str"),
            SemanticIssue::warning(Category::MissingReturn, "no return"),
        ];
        let deduped = dedup_issues(issues);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].effect_index, Some(1));
    }

    #[test]
    fn test_same_category_different_message_survives_dedup() {
        let issues = vec![
            SemanticIssue::warning(Category::UnusedParameter, "parameter 'a' unused"),
            SemanticIssue::warning(Category::UnusedParameter, "parameter 'b' unused"),
        ];
        assert_eq!(dedup_issues(issues).len(), 2);
    }

    #[test]
    fn test_display_includes_category_and_index() {
        let issue =
            SemanticIssue::warning(Category::OffByOne, "may return last match").with_effect_index(2);
        let rendered = issue.to_string();
        assert!(rendered.contains("off_by_one"));
        assert!(rendered.contains("effect 2"));
    }

    #[test]
    fn test_serializes_snake_case() {
        let issue = SemanticIssue::error(Category::MissingReturnPath, "not all paths return");
        let json = serde_json::to_string(&issue).expect("serialize");
        assert!(json.contains("\"missing_return_path\""));
        assert!(json.contains("\"error\""));
    }
}
