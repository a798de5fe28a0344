//! Effective, equivalent and real rates, plus the periodic rate converter.

use crate::catalog::{Evaluation, FormulaCategory, FormulaSpec};
use crate::{CalculationResult, CalculatorError, CalculatorInputs};

const CATEGORY: FormulaCategory = FormulaCategory::Rates;

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_tasa_efectiva_from_nominal",
        category: CATEGORY,
        output: "i",
        label: "Calcular Tasa Efectiva (i) desde Nominal",
        inputs: &["j", "m"],
        optional: &[("t", 1.0)],
        template: "(1 + j / m)^(m * t) - 1",
        eval: effective_from_nominal,
    },
    FormulaSpec {
        name: "formula_tasa_equivalente",
        category: CATEGORY,
        output: "i_eq",
        label: "Calcular Tasa Equivalente",
        inputs: &["i_conocida", "n_deseada", "n_conocida"],
        optional: &[],
        template: "(1 + i_conocida)^(n_deseada / n_conocida) - 1",
        eval: equivalent_rate,
    },
    FormulaSpec {
        name: "formula_tasa_real",
        category: CATEGORY,
        output: "r",
        label: "Calcular Tasa Real (r)",
        inputs: &["i", "pi"],
        optional: &[],
        template: "(i - pi) / (1 + pi)",
        eval: real_rate,
    },
];

/// Named day-count periods offered by the rate converter.
pub const PERIODS: &[(u32, &str)] = &[
    (1, "Diaria (TED)"),
    (15, "Quincenal"),
    (30, "Mensual (TEM)"),
    (60, "Bimestral"),
    (90, "Trimestral (TET)"),
    (120, "Cuatrimestral"),
    (180, "Semestral"),
    (360, "Anual (TEA)"),
];

/// Display name of a day-count period, if it is one of the named ones.
pub fn period_name(days: u32) -> Option<&'static str> {
    PERIODS.iter().find(|(d, _)| *d == days).map(|(_, name)| *name)
}

fn effective_from_nominal(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [j, m, t] = inputs.numbers(["j", "m", "t"])?;
    if m == 0.0 {
        return Err(CalculatorError::InvalidInputValue {
            formula: inputs.formula().to_string(),
            input: "m".to_string(),
            reason: "la frecuencia de capitalización no puede ser cero".to_string(),
        });
    }
    Ok(Evaluation::new((1.0 + j / m).powf(m * t) - 1.0))
}

fn equivalent_rate(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [known, wanted_days, known_days] = inputs.numbers(["i_conocida", "n_deseada", "n_conocida"])?;
    Ok(Evaluation::new((1.0 + known).powf(wanted_days / known_days) - 1.0))
}

fn real_rate(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [i, inflation] = inputs.numbers(["i", "pi"])?;
    Ok(Evaluation::new((i - inflation) / (1.0 + inflation)))
}

/// Converts an effective rate, in percent, from one day-count period to another.
///
/// `2.0` percent monthly (30 days) becomes `26.824...` percent annual (360 days).
pub fn convert_periodic_rate(rate_percent: f64, from_days: u32, to_days: u32) -> CalculationResult<f64> {
    if !rate_percent.is_finite() || rate_percent < 0.0 {
        return Err(CalculatorError::InvalidConversion {
            reason: format!("rate must be a non-negative number, got {rate_percent}"),
        });
    }
    if from_days == 0 || to_days == 0 {
        return Err(CalculatorError::InvalidConversion {
            reason: "periods must be at least one day".to_string(),
        });
    }

    let rate = rate_percent / 100.0;
    let exponent = f64::from(to_days) / f64::from(from_days);
    Ok(((1.0 + rate).powf(exponent) - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlanInputs, PlanValue};

    fn values(pairs: &[(&str, f64)]) -> PlanInputs {
        pairs.iter().map(|(k, v)| (k.to_string(), PlanValue::Number(*v))).collect()
    }

    #[test]
    fn test_effective_rate_defaults_to_one_year() {
        let outcome = FORMULAS[0].compute(&values(&[("j", 0.12), ("m", 12.0)])).unwrap();
        assert!((outcome.result - (1.01_f64.powi(12) - 1.0)).abs() < 1e-12);
        assert!(outcome.substituted_formula.starts_with("(1 + 0.12 / 12)^(12 * 1) - 1 = "));
    }

    #[test]
    fn test_effective_rate_for_a_month() {
        let outcome =
            FORMULAS[0].compute(&values(&[("j", 0.24), ("m", 12.0), ("t", 1.0 / 12.0)])).unwrap();
        assert!((outcome.result - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_effective_rate_rejects_zero_frequency() {
        let err = FORMULAS[0].compute(&values(&[("j", 0.24), ("m", 0.0)])).unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidInputValue { ref input, .. } if input == "m"));
    }

    #[test]
    fn test_equivalent_rate() {
        let outcome = FORMULAS[1]
            .compute(&values(&[("i_conocida", 0.02), ("n_deseada", 15.0), ("n_conocida", 30.0)]))
            .unwrap();
        assert!((outcome.result - (1.02_f64.sqrt() - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_real_rate() {
        let outcome = FORMULAS[2].compute(&values(&[("i", 0.12), ("pi", 0.04)])).unwrap();
        assert!((outcome.result - 0.08 / 1.04).abs() < 1e-12);
    }

    #[test]
    fn test_convert_monthly_to_annual() {
        let annual = convert_periodic_rate(2.0, 30, 360).unwrap();
        assert!((annual - (1.02_f64.powi(12) - 1.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_rejects_negative_rate_and_zero_period() {
        assert!(matches!(convert_periodic_rate(-1.0, 30, 360), Err(CalculatorError::InvalidConversion { .. })));
        assert!(matches!(convert_periodic_rate(f64::NAN, 30, 360), Err(CalculatorError::InvalidConversion { .. })));
        assert!(matches!(convert_periodic_rate(2.0, 0, 360), Err(CalculatorError::InvalidConversion { .. })));
    }

    #[test]
    fn test_period_names() {
        assert_eq!(period_name(360), Some("Anual (TEA)"));
        assert_eq!(period_name(7), None);
    }
}
