use thiserror::Error;

/// Failures raised while selecting or invoking a formula.
///
/// Non-finite results are not errors at this level; the plan executor checks
/// every result after the formula returns.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalculatorError {
    #[error("formula '{formula}' is not implemented in the calculation engine")]
    UnknownFormula { formula: String },

    #[error("formula '{formula}' requires input '{input}'")]
    MissingInput { formula: String, input: String },

    #[error("input '{input}' of formula '{formula}' must be a {expected}, found '{found}'")]
    InvalidInputType { formula: String, input: String, expected: &'static str, found: String },

    #[error("input '{input}' of formula '{formula}' is invalid: {reason}")]
    InvalidInputValue { formula: String, input: String, reason: String },

    #[error("experimental formula selected but no 'generated_formula' was provided")]
    MissingExpression,

    #[error("could not evaluate expression '{expression}': {message}")]
    Expression { expression: String, message: String },

    #[error("invalid rate conversion: {reason}")]
    InvalidConversion { reason: String },
}

impl CalculatorError {
    /// Short machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            CalculatorError::UnknownFormula { .. } => "unknown_formula",
            CalculatorError::MissingInput { .. } => "missing_input",
            CalculatorError::InvalidInputType { .. } => "invalid_input_type",
            CalculatorError::InvalidInputValue { .. } => "invalid_input_value",
            CalculatorError::MissingExpression => "missing_expression",
            CalculatorError::Expression { .. } => "expression",
            CalculatorError::InvalidConversion { .. } => "invalid_conversion",
        }
    }
}
