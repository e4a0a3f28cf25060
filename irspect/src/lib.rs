//! irspect Library
//!
//! Semantic validation for natural-language function specifications. The
//! crate inspects an Intermediate Representation of an intended function
//! (intent, signature, ordered effect clauses, assertions), runs symbolic
//! execution over the effect narrative, and decides whether the spec is safe
//! to hand to code generation. It is a best-effort, explainable heuristic
//! analyzer, not a formal verifier: malformed input degrades to issues, never
//! a failure.

pub mod analyzer;
pub mod detector;
pub mod error;
pub mod interp;
pub mod ir;
pub mod issue;
pub mod trace;
pub mod util;
pub mod validator;

pub use error::{Result, SpecError};
pub use interp::{InterpretationResult, interpret, should_generate_code};
pub use ir::IntermediateRepresentation;
pub use issue::{Category, SemanticIssue, Severity};
pub use trace::ExecutionTrace;
pub use validator::ValidationResult;
