//! Error handling for plan execution
//!
//! Every variant raised while executing a plan names the step it came from,
//! and the formula when one was selected.

use fincalc_calculator::CalculatorError;
use std::fmt;
use thiserror::Error;

/// Error type for FinCalc engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FincalcError {
    /// A `{{name}}` back-reference did not match any earlier binding
    #[error("step '{step}': variable '{variable}' from a previous step was not found")]
    MissingVariable { variable: String, step: String },

    #[error("step '{step}': formula '{formula}' is not implemented in the calculation engine")]
    UnknownFormula { formula: String, step: String },

    #[error("step '{step}': experimental formula selected but no 'generated_formula' was provided")]
    MissingExpression { step: String },

    #[error("step '{step}': formula '{formula}' requires input '{input}'")]
    MissingInput { formula: String, input: String, step: String },

    /// Input present but of the wrong type or outside the formula's domain
    #[error("step '{step}': {message}")]
    InvalidInput { formula: String, input: String, step: String, message: String },

    /// The formula returned NaN or an infinity
    #[error(
        "step '{step}': the calculation for '{formula}' produced an invalid value ({value}); check the inputs"
    )]
    InvalidResult { formula: String, step: String, value: f64 },

    #[error("step '{step}': could not evaluate expression '{expression}': {message}")]
    Expression { step: String, expression: String, message: String },

    /// Model output that could not be turned into a plan
    #[error("could not parse calculation plan: {message}")]
    PlanParse { message: String },

    /// Manual calculator input rejected before a plan was built
    #[error("invalid value for '{input}': {message}")]
    ManualInput { input: String, message: String },

    /// Calculator failure outside any plan step, such as a rate conversion
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
}

impl FincalcError {
    /// Attaches the failing step to a calculator error.
    pub fn in_step(error: CalculatorError, step: &str) -> Self {
        let step = step.to_string();
        let message = error.to_string();
        match error {
            CalculatorError::UnknownFormula { formula } => Self::UnknownFormula { formula, step },
            CalculatorError::MissingInput { formula, input } => Self::MissingInput { formula, input, step },
            CalculatorError::MissingExpression => Self::MissingExpression { step },
            CalculatorError::Expression { expression, message } => {
                Self::Expression { step, expression, message }
            }
            CalculatorError::InvalidInputType { formula, input, .. }
            | CalculatorError::InvalidInputValue { formula, input, .. } => {
                Self::InvalidInput { formula, input, step, message }
            }
            other => Self::Calculator(other),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            FincalcError::MissingVariable { .. } => "reference",
            FincalcError::UnknownFormula { .. } => "formula",
            FincalcError::MissingExpression { .. } | FincalcError::Expression { .. } => "expression",
            FincalcError::MissingInput { .. }
            | FincalcError::InvalidInput { .. }
            | FincalcError::ManualInput { .. } => "input",
            FincalcError::InvalidResult { .. } => "result",
            FincalcError::PlanParse { .. } => "parse",
            FincalcError::Calculator(_) => "calculator",
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FincalcError::ManualInput { .. } | FincalcError::Calculator(_) => ErrorSeverity::Low,
            FincalcError::MissingVariable { .. }
            | FincalcError::MissingInput { .. }
            | FincalcError::InvalidInput { .. }
            | FincalcError::InvalidResult { .. }
            | FincalcError::Expression { .. }
            | FincalcError::MissingExpression { .. } => ErrorSeverity::Medium,
            // the plan generator asked for something the engine cannot do
            FincalcError::UnknownFormula { .. } | FincalcError::PlanParse { .. } => ErrorSeverity::High,
        }
    }

    /// Step the error occurred in, if it happened during execution
    pub fn step(&self) -> Option<&str> {
        match self {
            FincalcError::MissingVariable { step, .. }
            | FincalcError::UnknownFormula { step, .. }
            | FincalcError::MissingExpression { step }
            | FincalcError::MissingInput { step, .. }
            | FincalcError::InvalidInput { step, .. }
            | FincalcError::InvalidResult { step, .. }
            | FincalcError::Expression { step, .. } => Some(step),
            FincalcError::PlanParse { .. }
            | FincalcError::ManualInput { .. }
            | FincalcError::Calculator(_) => None,
        }
    }

    /// Formula the error is about, if one was selected
    pub fn formula(&self) -> Option<&str> {
        match self {
            FincalcError::UnknownFormula { formula, .. }
            | FincalcError::MissingInput { formula, .. }
            | FincalcError::InvalidInput { formula, .. }
            | FincalcError::InvalidResult { formula, .. } => Some(formula),
            FincalcError::MissingExpression { .. } | FincalcError::Expression { .. } => {
                Some(fincalc_types::EXPERIMENTAL_FORMULA)
            }
            _ => None,
        }
    }
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
        }
    }
}

/// Result type alias for engine operations
pub type FincalcResult<T> = Result<T, FincalcError>;
