//! Closed keyword vocabulary for effect analysis
//!
//! All tables are immutable static data, evaluated top-to-bottom so that
//! "first match wins" stays deterministic. Regexes are compiled once at first
//! use and shared for the life of the process.

use lazy_static::lazy_static;
use regex::Regex;

use crate::trace::{ANY_TYPE, Operation};
use crate::util::contains_word;

/// Operation synonym groups, tried in order; the first group with a hit wins.
/// Single-word synonyms match as whole tokens, multi-word ones as phrases.
pub const OPERATION_SYNONYMS: &[(&[&str], Operation)] = &[
    (&["split", "divide", "separate", "break"], Operation::Split),
    (&["join", "concatenate", "merge", "combine"], Operation::Join),
    (&["filter", "exclude", "discard", "keep only"], Operation::Filter),
    (&["map", "transform", "convert", "apply"], Operation::Map),
    (&["reduce", "fold", "accumulate", "aggregate"], Operation::Reduce),
    (
        &["iterate", "loop", "traverse", "enumerate", "go through", "for each"],
        Operation::Iterate,
    ),
    (&["count", "tally", "number of"], Operation::Count),
    (
        &["calculate", "compute", "sum", "multiply", "subtract", "add"],
        Operation::Calculate,
    ),
    (&["check", "verify", "validate", "ensure", "test"], Operation::Check),
    (&["get", "retrieve", "fetch", "take", "read", "access"], Operation::Get),
    (&["find", "search", "locate", "look up"], Operation::Find),
    (&["return", "output", "yield", "give back", "send back"], Operation::Return),
    (&["if", "when", "in case"], Operation::If),
    (&["else", "otherwise"], Operation::Else),
];

/// Keywords that indicate an effect returns something
pub const RETURN_KEYWORDS: &[&str] = &["return", "output", "yield", "give back", "send back"];

/// Keywords that mark an effect as conditional
pub const CONDITIONAL_KEYWORDS: &[&str] = &["if", "when", "else", "otherwise"];

/// Vocabulary accepted as evidence that a loop terminates
pub const TERMINATION_KEYWORDS: &[&str] = &["until", "while", "when", "if", "condition"];

/// Keyword -> type inference table, tried in order over description + name.
/// `str` is last: "text"/"word" show up in almost every narrative.
pub const TYPE_KEYWORDS: &[(&[&str], &str)] = &[
    (&["count", "index", "length", "total", "integer", "position"], "int"),
    (&["average", "mean", "ratio", "percentage", "decimal", "float"], "float"),
    (&["flag", "boolean", "whether", "true", "false"], "bool"),
    (&["list", "items", "elements", "array", "words", "lines", "collection"], "list"),
    (&["dict", "dictionary", "mapping"], "dict"),
    (&["tuple", "pair"], "tuple"),
    (&["text", "string", "word", "name", "sentence", "character"], "str"),
];

/// Element-type evidence used to refine a bare `list` into `list[str]`
const STR_ELEMENT_KEYWORDS: &[&str] = &["word", "words", "string", "strings", "text", "line", "lines"];

/// Literals that may appear as a returned expression
pub const LITERAL_KEYWORDS: &[(&str, &str)] = &[
    ("true", "bool"),
    ("false", "bool"),
    ("none", ANY_TYPE),
    ("null", ANY_TYPE),
    ("nothing", ANY_TYPE),
    ("zero", "int"),
    ("one", "int"),
];

/// Words stripped when naming a value from an "into <phrase>" clause
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "its", "their", "some", "new", "single", "separate",
    "individual", "called", "named", "list", "set", "collection",
];

lazy_static! {
    /// "return (the )?<identifier>", generalized over the return synonyms and
    /// tolerant of a leading qualifier ("the first ...", "the modified ...")
    pub static ref RETURN_IDENT_RE: Regex = Regex::new(
        r"\b(?:return|output|yield|give\s+back|send\s+back)(?:s|ed|ing)?\s+(?:the\s+|a\s+|an\s+)?(?:first\s+|last\s+|final\s+|new\s+|modified\s+|resulting\s+)?([a-z_][a-z0-9_]*)"
    )
    .unwrap();

    /// "... into <trailing noun phrase>"
    pub static ref INTO_RE: Regex = Regex::new(r"\binto\s+([a-z_][a-z0-9_ ]*)").unwrap();

    /// "take/get/read/accept the parameter <name>"
    pub static ref TAKE_PARAM_RE: Regex = Regex::new(
        r"\b(?:take|get|read|accept|receive)s?\s+(?:the\s+)?(?:parameter|argument|input)\s+([a-z_][a-z0-9_]*)"
    )
    .unwrap();

    /// "count the ..."
    pub static ref COUNT_RE: Regex = Regex::new(r"\bcount(?:s|ing)?\b").unwrap();

    /// "find the ... index/value/position"
    pub static ref FIND_RE: Regex =
        Regex::new(r"\bfind(?:s|ing)?\b.*?\b(index|value|position)\b").unwrap();

    /// "calculate/compute ..."
    pub static ref CALCULATE_RE: Regex =
        Regex::new(r"\b(?:calculate|compute)(?:s|d|ing)?\b").unwrap();
}

/// Match a lower-cased description against one synonym.
/// Phrases match as substrings, single words as whole tokens.
fn matches_keyword(description: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        description.contains(keyword)
    } else {
        contains_word(description, keyword)
    }
}

/// Detect the operation of an effect description. First matching synonym
/// group wins; at most one operation per effect.
pub fn detect_operation(description: &str) -> Option<Operation> {
    for (synonyms, op) in OPERATION_SYNONYMS {
        if synonyms.iter().any(|kw| matches_keyword(description, kw)) {
            return Some(*op);
        }
    }
    None
}

/// Whether the description indicates that something is returned
pub fn has_return_keyword(description: &str) -> bool {
    RETURN_KEYWORDS.iter().any(|kw| matches_keyword(description, kw))
}

/// Whether the description is guarded by a condition
pub fn is_conditional(description: &str) -> bool {
    CONDITIONAL_KEYWORDS.iter().any(|kw| matches_keyword(description, kw))
}

/// Whether the text carries any loop-termination vocabulary
pub fn has_termination_keyword(text: &str) -> bool {
    TERMINATION_KEYWORDS.iter().any(|kw| matches_keyword(text, kw))
}

/// Infer a type hint by scanning the description plus the candidate name
/// against the closed keyword table. Defaults to the wildcard.
pub fn infer_type(description: &str, name: &str) -> String {
    let combined = format!("{description} {name}");
    for (keywords, ty) in TYPE_KEYWORDS {
        if keywords.iter().any(|kw| matches_keyword(&combined, kw)) {
            if *ty == "list"
                && STR_ELEMENT_KEYWORDS.iter().any(|kw| contains_word(&combined, kw))
            {
                return "list[str]".to_string();
            }
            return (*ty).to_string();
        }
    }
    ANY_TYPE.to_string()
}

/// Type of a literal keyword, if the identifier is one
pub fn literal_type(ident: &str) -> Option<&'static str> {
    LITERAL_KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == ident)
        .map(|(_, ty)| *ty)
}

/// Name a value from an "into <phrase>" capture: tokenize, drop stop words,
/// join the rest with underscores. Empty after stripping means no name.
pub fn name_from_phrase(phrase: &str) -> Option<String> {
    let kept: Vec<&str> = phrase
        .split_whitespace()
        .filter(|tok| !STOP_WORDS.contains(tok))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join("_"))
    }
}
