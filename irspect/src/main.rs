//! irspect CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use irspect::error::report_issues;
use irspect::{IntermediateRepresentation, Result, SpecError, interpret, should_generate_code};

#[derive(Parser)]
#[command(name = "irspect", version, about = "irspect - validate function specs before codegen")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate an IR file and report all issues
    Check {
        /// IR file (JSON) to validate
        file: PathBuf,
    },
    /// Dump the symbolic execution trace (debug)
    Trace {
        /// IR file (JSON) to analyze
        file: PathBuf,
    },
    /// Emit all issues as JSON for machine consumption
    Issues {
        /// IR file (JSON) to validate
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Check { file } => check_file(&file),
        Command::Trace { file } => trace_file(&file),
        Command::Issues { file } => issues_file(&file),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn load_ir(path: &PathBuf) -> Result<IntermediateRepresentation> {
    let source = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&source)?;
    if !value.is_object() {
        return Err(SpecError::schema_error("top-level IR must be a JSON object"));
    }
    Ok(serde_json::from_value(value)?)
}

fn check_file(path: &PathBuf) -> Result<i32> {
    let ir = load_ir(path)?;
    let result = interpret(&ir);
    let filename = path.display().to_string();

    report_issues(&filename, &result.ir, &result.issues);

    let name = if result.ir.signature.name.is_empty() {
        "<unnamed>"
    } else {
        result.ir.signature.name.as_str()
    };
    if should_generate_code(&result) {
        println!(
            "ok: '{name}' is ready for code generation ({} warning(s))",
            result.warnings().len()
        );
        Ok(0)
    } else {
        println!(
            "blocked: '{name}' has {} error(s), code generation must not proceed",
            result.errors().len()
        );
        Ok(1)
    }
}

fn trace_file(path: &PathBuf) -> Result<i32> {
    let ir = load_ir(path)?;
    let result = interpret(&ir);
    println!("{}", serde_json::to_string_pretty(&result.trace)?);
    Ok(0)
}

fn issues_file(path: &PathBuf) -> Result<i32> {
    let ir = load_ir(path)?;
    let result = interpret(&ir);
    println!("{}", serde_json::to_string_pretty(&result.issues)?);
    Ok(0)
}
