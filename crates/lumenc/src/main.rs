//! Lumen checker driver
//!
//! Front end for the type checker: reads a desugared Core AST module
//! (JSON, as produced by the upstream desugarer), runs inference, and
//! prints either the top-level schemes or a rendered diagnostic.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lumen_ast::Module;
use lumen_types::{CheckOptions, Stdlib, TypeChecker, ValueBinding};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "lumenc")]
#[command(about = "Lumen type checker - check desugared Lumen modules", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check a module
    Check {
        /// Core AST module file (JSON)
        file: PathBuf,

        /// Which built-in roster to seed
        #[arg(long, default_value = "full")]
        stdlib: String,

        /// Treat escaping top-level type variables as errors
        #[arg(long)]
        deny_any: bool,

        /// Print the resolved type of every expression node
        #[arg(long)]
        emit_types: bool,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check {
            file,
            stdlib,
            deny_any,
            emit_types,
        } => check_command(&file, &stdlib, deny_any, emit_types),
    }
}

fn check_command(
    file: &PathBuf,
    stdlib: &str,
    deny_any: bool,
    emit_types: bool,
) -> Result<ExitCode> {
    let stdlib = match stdlib {
        "minimal" => Stdlib::Minimal,
        "full" => Stdlib::Full,
        other => anyhow::bail!("unknown stdlib roster `{}` (expected minimal or full)", other),
    };

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("reading module file {}", file.display()))?;
    let module: Module = serde_json::from_str(&source)
        .with_context(|| format!("parsing module file {}", file.display()))?;

    info!(file = %file.display(), decls = module.decls.len(), "checking module");

    let options = CheckOptions {
        stdlib,
        deny_any,
        ..CheckOptions::default()
    };
    let checked = match TypeChecker::new(options).check_module(&module) {
        Ok(checked) => checked,
        Err(err) => {
            eprintln!("{}", err.to_diagnostic(&module.files).render());
            return Ok(ExitCode::FAILURE);
        }
    };

    for warning in &checked.warnings {
        eprintln!("{}", warning.render());
    }

    let mut names: Vec<&String> = checked.bindings.keys().collect();
    names.sort();
    for name in names {
        println!("{} : {}", name, checked.bindings[name]);
    }

    if !checked.exports.is_empty() {
        let mut exported: Vec<&String> = checked.exports.keys().collect();
        exported.sort();
        println!("exports:");
        for name in exported {
            match &checked.exports[name] {
                ValueBinding::Value(scheme) | ValueBinding::External { scheme, .. } => {
                    println!("  {} : {}", name, scheme);
                }
                ValueBinding::ExternalOverload(overloads) => {
                    for overload in overloads {
                        println!("  {} : {}", name, overload.scheme);
                    }
                }
            }
        }
    }

    if emit_types {
        let mut ids: Vec<_> = checked.types.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            println!("#{} : {}", id, checked.types[&id]);
        }
    }

    Ok(ExitCode::SUCCESS)
}
