//! The formula catalog for the FinCalc engine.
//!
//! This crate provides the fixed table of closed-form financial formulas
//! (interest, rates, discounts, annuities, gradients and loans), the
//! `CalculatorInputs` accessor those formulas read their parameters through,
//! and the sandboxed arithmetic DSL used by experimental plan steps.

pub mod built_in;
pub mod catalog;
pub mod dsl;
pub mod error;
pub mod substitution;

pub use catalog::{Evaluation, FormulaCatalog, FormulaCategory, FormulaOutcome, FormulaSpec};
pub use dsl::{ExpressionEvaluator, ExpressionLimits};
pub use error::CalculatorError;
pub use fincalc_types::{EXPERIMENTAL_FORMULA, PlanInputs, PlanValue};

/// Result type used by formula implementations.
pub type CalculationResult<T> = Result<T, CalculatorError>;

/// Provides a safe interface for formulas to access their resolved inputs.
///
/// Optional parameters declared by a formula fall back to their default when the
/// plan does not supply them.
#[derive(Debug)]
pub struct CalculatorInputs<'a> {
    formula: &'a str,
    variables: &'a PlanInputs,
    defaults: &'a [(&'static str, f64)],
}

impl<'a> CalculatorInputs<'a> {
    /// Creates a new `CalculatorInputs` for `formula`.
    pub fn new(
        formula: &'a str,
        variables: &'a PlanInputs,
        defaults: &'a [(&'static str, f64)],
    ) -> Self {
        Self { formula, variables, defaults }
    }

    /// Name of the formula these inputs belong to.
    pub fn formula(&self) -> &str {
        self.formula
    }

    /// Gets a number. Numeric text such as `"0.24"` is accepted.
    pub fn get_f64(&self, name: &str) -> CalculationResult<f64> {
        match self.variables.get(name) {
            Some(PlanValue::Number(n)) => Ok(*n),
            Some(PlanValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| {
                CalculatorError::InvalidInputType {
                    formula: self.formula.to_string(),
                    input: name.to_string(),
                    expected: "number",
                    found: s.clone(),
                }
            }),
            None => self
                .defaults
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| CalculatorError::MissingInput {
                    formula: self.formula.to_string(),
                    input: name.to_string(),
                }),
        }
    }

    /// Gets several numbers at once, in the order requested.
    pub fn numbers<const N: usize>(&self, names: [&str; N]) -> CalculationResult<[f64; N]> {
        let mut values = [0.0; N];
        for (slot, name) in values.iter_mut().zip(names) {
            *slot = self.get_f64(name)?;
        }
        Ok(values)
    }

    /// Gets a text value, such as an ISO date.
    pub fn get_text(&self, name: &str) -> CalculationResult<&'a str> {
        match self.variables.get(name) {
            Some(PlanValue::Text(s)) => Ok(s.as_str()),
            Some(PlanValue::Number(n)) => Err(CalculatorError::InvalidInputType {
                formula: self.formula.to_string(),
                input: name.to_string(),
                expected: "text",
                found: fincalc_types::format_number(*n),
            }),
            None => Err(CalculatorError::MissingInput {
                formula: self.formula.to_string(),
                input: name.to_string(),
            }),
        }
    }

    /// The supplied inputs plus defaults for any optional input left out.
    pub fn with_defaults(&self) -> PlanInputs {
        let mut values = self.variables.clone();
        for (name, value) in self.defaults {
            values.entry((*name).to_string()).or_insert(PlanValue::Number(*value));
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, PlanValue)]) -> PlanInputs {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_get_f64_accepts_numeric_text() {
        let values = inputs(&[("j", PlanValue::from("0.24")), ("m", PlanValue::Number(12.0))]);
        let calc_inputs = CalculatorInputs::new("formula_x", &values, &[]);
        assert_eq!(calc_inputs.numbers(["j", "m"]).unwrap(), [0.24, 12.0]);
    }

    #[test]
    fn test_missing_input_names_formula_and_parameter() {
        let values = PlanInputs::new();
        let calc_inputs = CalculatorInputs::new("formula_is_S_from_Pjn", &values, &[]);
        let err = calc_inputs.get_f64("P").unwrap_err();
        assert!(matches!(
            err,
            CalculatorError::MissingInput { ref formula, ref input }
                if formula == "formula_is_S_from_Pjn" && input == "P"
        ));
    }

    #[test]
    fn test_defaults_fill_optional_inputs() {
        let values = inputs(&[("j", PlanValue::Number(0.12))]);
        let calc_inputs = CalculatorInputs::new("formula_x", &values, &[("t", 1.0)]);
        assert_eq!(calc_inputs.get_f64("t").unwrap(), 1.0);
        assert_eq!(calc_inputs.with_defaults()["t"], PlanValue::Number(1.0));
    }

    #[test]
    fn test_text_and_number_type_mismatch() {
        let values = inputs(&[("fecha", PlanValue::Number(3.0)), ("P", PlanValue::from("abc"))]);
        let calc_inputs = CalculatorInputs::new("formula_x", &values, &[]);
        assert!(matches!(
            calc_inputs.get_text("fecha"),
            Err(CalculatorError::InvalidInputType { expected: "text", .. })
        ));
        assert!(matches!(
            calc_inputs.get_f64("P"),
            Err(CalculatorError::InvalidInputType { expected: "number", .. })
        ));
    }
}
