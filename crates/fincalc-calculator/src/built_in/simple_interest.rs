//! Simple interest: `S = P * (1 + j * n)`, solved for each unknown.

use crate::catalog::{Evaluation, FormulaCategory, FormulaSpec};
use crate::{CalculationResult, CalculatorInputs};

const CATEGORY: FormulaCategory = FormulaCategory::SimpleInterest;

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_is_I_from_Pjn",
        category: CATEGORY,
        output: "I",
        label: "Calcular Interés (I)",
        inputs: &["P", "j", "n"],
        optional: &[],
        template: "P * j * n",
        eval: interest,
    },
    FormulaSpec {
        name: "formula_is_S_from_Pjn",
        category: CATEGORY,
        output: "S",
        label: "Calcular Monto (S)",
        inputs: &["P", "j", "n"],
        optional: &[],
        template: "P * (1 + j * n)",
        eval: future_value,
    },
    FormulaSpec {
        name: "formula_is_P_from_Sjn",
        category: CATEGORY,
        output: "P",
        label: "Calcular Capital (P) desde Monto",
        inputs: &["S", "j", "n"],
        optional: &[],
        template: "S / (1 + j * n)",
        eval: present_value,
    },
    FormulaSpec {
        name: "formula_is_P_from_Ijn",
        category: CATEGORY,
        output: "P",
        label: "Calcular Capital (P) desde Interés",
        inputs: &["I", "j", "n"],
        optional: &[],
        template: "I / (j * n)",
        eval: principal_from_interest,
    },
    FormulaSpec {
        name: "formula_is_n_from_IPj",
        category: CATEGORY,
        output: "n",
        label: "Calcular Tiempo (n) desde Interés",
        inputs: &["I", "P", "j"],
        optional: &[],
        template: "I / (P * j)",
        eval: term_from_interest,
    },
    FormulaSpec {
        name: "formula_is_j_from_IPn",
        category: CATEGORY,
        output: "j",
        label: "Calcular Tasa (j) desde Interés",
        inputs: &["I", "P", "n"],
        optional: &[],
        template: "I / (P * n)",
        eval: rate_from_interest,
    },
    FormulaSpec {
        name: "formula_is_n_from_SPI",
        category: CATEGORY,
        output: "n",
        label: "Calcular Tiempo (n) desde Monto",
        inputs: &["S", "P", "j"],
        optional: &[],
        template: "(S / P - 1) / j",
        eval: term_from_amounts,
    },
    FormulaSpec {
        name: "formula_is_j_from_SPn",
        category: CATEGORY,
        output: "j",
        label: "Calcular Tasa (j) desde Monto",
        inputs: &["S", "P", "n"],
        optional: &[],
        template: "(S / P - 1) / n",
        eval: rate_from_amounts,
    },
];

fn interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, j, n] = inputs.numbers(["P", "j", "n"])?;
    Ok(Evaluation::new(p * j * n))
}

fn future_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, j, n] = inputs.numbers(["P", "j", "n"])?;
    Ok(Evaluation::new(p * (1.0 + j * n)))
}

fn present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, j, n] = inputs.numbers(["S", "j", "n"])?;
    Ok(Evaluation::new(s / (1.0 + j * n)))
}

fn principal_from_interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [interest, j, n] = inputs.numbers(["I", "j", "n"])?;
    Ok(Evaluation::new(interest / (j * n)))
}

fn term_from_interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [interest, p, j] = inputs.numbers(["I", "P", "j"])?;
    Ok(Evaluation::new(interest / (p * j)))
}

fn rate_from_interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [interest, p, n] = inputs.numbers(["I", "P", "n"])?;
    Ok(Evaluation::new(interest / (p * n)))
}

fn term_from_amounts(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, p, j] = inputs.numbers(["S", "P", "j"])?;
    Ok(Evaluation::new((s / p - 1.0) / j))
}

fn rate_from_amounts(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, p, n] = inputs.numbers(["S", "P", "n"])?;
    Ok(Evaluation::new((s / p - 1.0) / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlanInputs, PlanValue};

    fn run(name: &str, pairs: &[(&str, f64)]) -> f64 {
        let spec = FORMULAS.iter().find(|spec| spec.name == name).unwrap();
        let values: PlanInputs =
            pairs.iter().map(|(k, v)| (k.to_string(), PlanValue::Number(*v))).collect();
        spec.compute(&values).unwrap().result
    }

    #[test]
    fn test_interest_and_amount_agree() {
        let interest = run("formula_is_I_from_Pjn", &[("P", 5000.0), ("j", 0.18), ("n", 0.5)]);
        let amount = run("formula_is_S_from_Pjn", &[("P", 5000.0), ("j", 0.18), ("n", 0.5)]);
        assert!((interest - 450.0).abs() < 1e-9);
        assert!((amount - 5450.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_forms() {
        let p = run("formula_is_P_from_Sjn", &[("S", 5450.0), ("j", 0.18), ("n", 0.5)]);
        assert!((p - 5000.0).abs() < 1e-9);

        let p = run("formula_is_P_from_Ijn", &[("I", 450.0), ("j", 0.18), ("n", 0.5)]);
        assert!((p - 5000.0).abs() < 1e-9);

        let n = run("formula_is_n_from_IPj", &[("I", 450.0), ("P", 5000.0), ("j", 0.18)]);
        assert!((n - 0.5).abs() < 1e-12);

        let j = run("formula_is_j_from_IPn", &[("I", 450.0), ("P", 5000.0), ("n", 0.5)]);
        assert!((j - 0.18).abs() < 1e-12);

        let n = run("formula_is_n_from_SPI", &[("S", 5450.0), ("P", 5000.0), ("j", 0.18)]);
        assert!((n - 0.5).abs() < 1e-12);

        let j = run("formula_is_j_from_SPn", &[("S", 5450.0), ("P", 5000.0), ("n", 0.5)]);
        assert!((j - 0.18).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate_divides_to_infinity() {
        let n = run("formula_is_n_from_IPj", &[("I", 450.0), ("P", 5000.0), ("j", 0.0)]);
        assert!(n.is_infinite());
    }
}
