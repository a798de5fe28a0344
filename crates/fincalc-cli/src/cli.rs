//! FinCalc command-line interface
//!
//! Each subcommand renders its output to a `String`; `main` prints it. Engine
//! errors propagate so the process exits non-zero.

use crate::config::FincalcConfig;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use fincalc_calculator::built_in::rates::period_name;
use fincalc_calculator::substitution::render_trace;
use fincalc_core::{
    ExecutionReport, FormulaCategory, PlanExecutor, PlanValue, convert_periodic_rate, manual_plan,
    parse_assignments, parse_plan_response, parse_plan_strict,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use tracing::info;

/// FinCalc financial calculation plan engine
#[derive(Parser, Debug)]
#[command(name = "fincalc")]
#[command(about = "Deterministic execution of financial calculation plans")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a calculation plan file
    Run {
        /// Plan JSON file, or `-` for stdin
        plan: String,

        /// Accept raw model output: prose, code fences, missing or trailing commas
        #[arg(long)]
        lenient: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the formula catalog
    Formulas {
        /// Only show one category, e.g. `compound-interest`
        #[arg(short, long)]
        category: Option<FormulaCategory>,

        /// Print the grouped knowledge base text instead
        #[arg(long, conflicts_with = "category")]
        knowledge_base: bool,
    },

    /// Apply a single catalog formula
    Manual {
        formula: String,

        #[arg(short, long = "input", value_name = "NAME=VALUE")]
        inputs: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Evaluate an arithmetic expression
    Eval {
        #[arg(allow_hyphen_values = true)]
        expression: String,

        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },

    /// Convert an effective rate between day-count periods
    ConvertRate {
        /// Rate in percent, e.g. 2 for 2%
        #[arg(long)]
        rate: f64,

        /// Days in the known period
        #[arg(long)]
        from: u32,

        /// Days in the wanted period
        #[arg(long)]
        to: u32,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Log filter in effect: `--verbose` raises the configured filter to debug.
    pub fn log_filter(&self, config: &FincalcConfig) -> String {
        if self.verbose { "fincalc=debug".to_string() } else { config.logging.filter.clone() }
    }

    /// Executes the selected command and returns what should be printed.
    pub fn execute(&self, config: &FincalcConfig) -> Result<String> {
        let executor = PlanExecutor::with_limits(config.expression);
        let decimals = config.output.decimals;

        match &self.command {
            Command::Run { plan, lenient, format } => {
                let raw = read_plan_source(plan)?;
                let plan = if *lenient { parse_plan_response(&raw)? } else { parse_plan_strict(&raw)? };
                let report = executor.run(&plan)?;
                render_report(&report, *format, decimals)
            }
            Command::Formulas { category, knowledge_base } => {
                Ok(render_formulas(&executor, *category, *knowledge_base))
            }
            Command::Manual { formula, inputs, format } => {
                let inputs = parse_assignments(inputs.iter().map(String::as_str))?;
                let plan = manual_plan(executor.catalog(), formula, inputs)?;
                let report = executor.run(&plan)?;
                render_report(&report, *format, decimals)
            }
            Command::Eval { expression, vars } => evaluate(&executor, expression, vars),
            Command::ConvertRate { rate, from, to } => {
                let converted = convert_periodic_rate(*rate, *from, *to)?;
                Ok(format!(
                    "{rate}% {} = {converted:.6}% {}",
                    describe_period(*from),
                    describe_period(*to)
                ))
            }
        }
    }
}

fn read_plan_source(source: &str) -> Result<String> {
    if source == "-" {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read plan from stdin");
    }
    let contents = fs::read_to_string(source).with_context(|| format!("Failed to read plan file '{source}'"))?;
    info!(path = source, bytes = contents.len(), "Read plan file");
    Ok(contents)
}

/// Human-readable or JSON rendering of an executed plan.
pub fn render_report(report: &ExecutionReport, format: OutputFormat, decimals: usize) -> Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(report).context("Failed to serialise execution report");
    }

    let mut out = String::new();
    if !report.interpretation.is_empty() {
        writeln!(out, "{}", report.interpretation)?;
        writeln!(out)?;
    }
    for (index, step) in report.steps.iter().enumerate() {
        writeln!(out, "{}. {} [{}]", index + 1, step.step_name, step.formula_name)?;
        writeln!(out, "   {}", step.substituted_formula)?;
        writeln!(out, "   {} = {:.*}", step.target_variable, decimals, step.result)?;
    }
    match report.final_result {
        Some(value) => write!(out, "Resultado final: {} = {:.*}", report.final_target_variable, decimals, value)?,
        None => write!(out, "Resultado final: '{}' no fue calculado", report.final_target_variable)?,
    }
    Ok(out)
}

fn render_formulas(executor: &PlanExecutor, category: Option<FormulaCategory>, knowledge_base: bool) -> String {
    let catalog = executor.catalog();
    if knowledge_base {
        return catalog.knowledge_base();
    }

    let specs = match category {
        Some(category) => catalog.by_category(category),
        None => catalog.list(),
    };
    specs
        .iter()
        .map(|spec| format!("[{}] {}  ({})", spec.category, spec.describe(), spec.label))
        .collect::<Vec<_>>()
        .join("\n")
}

fn evaluate(executor: &PlanExecutor, expression: &str, vars: &[String]) -> Result<String> {
    let values = parse_assignments(vars.iter().map(String::as_str))?;

    let mut scope = HashMap::with_capacity(values.len());
    for (name, value) in &values {
        match value {
            PlanValue::Number(number) => scope.insert(name.clone(), *number),
            PlanValue::Text(text) => bail!("variable '{name}' must be a number, got '{text}'"),
        };
    }

    let result = executor.catalog().evaluator().eval(expression, &scope)?;
    Ok(render_trace(expression, &values, result, None))
}

fn describe_period(days: u32) -> String {
    period_name(days).map(str::to_string).unwrap_or_else(|| format!("{days} días"))
}
