//! FinCalc Types
//!
//! This crate defines the plan data model shared by the FinCalc ecosystem
//! (`fincalc-calculator`, `fincalc-core` and the CLI). A `CalculationPlan` is
//! produced upstream (a language model or the manual calculator form) and is
//! consumed, never mutated, by the plan executor.

#![warn(missing_docs)]

mod types;
pub use types::{
    CalculationPlan, CalculationStep, ExecutedStep, PlanInputs, PlanValue, format_number,
};

/// Sentinel `formula_name` selecting the free-text expression path instead of a
/// catalog entry.
pub const EXPERIMENTAL_FORMULA: &str = "formula_experimental";
