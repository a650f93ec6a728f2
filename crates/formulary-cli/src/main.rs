//! Formulary CLI - formula evaluation tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formulary_engine::{evaluate, extract_variables, Bindings};

#[derive(Parser)]
#[command(name = "formulary")]
#[command(author, version, about = "Evaluate arithmetic formulas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against variable bindings
    Eval {
        /// Formula text, e.g. "PI * r^2"
        formula: String,

        /// Variable binding as name=value (repeatable)
        #[arg(short = 'v', long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
    },

    /// List the free variables of a formula
    Vars {
        /// Formula text
        formula: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { formula, vars } => eval_formula(&formula, vars),
        Commands::Vars { formula } => list_vars(&formula),
    }
}

fn eval_formula(formula: &str, vars: Vec<(String, f64)>) -> Result<()> {
    let bindings: Bindings = vars.into_iter().collect();

    let result = evaluate(formula, &bindings)
        .with_context(|| format!("Failed to evaluate '{}'", formula))?;

    println!("{}", result);
    Ok(())
}

fn list_vars(formula: &str) -> Result<()> {
    for name in extract_variables(formula) {
        println!("{}", name);
    }
    Ok(())
}

/// Parse a `name=value` binding argument
fn parse_binding(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;

    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;

    Ok((name.trim().to_string(), value))
}
