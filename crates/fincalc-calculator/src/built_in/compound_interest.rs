//! Compound interest: `S = P * (1 + i)^n` and its nominal-rate variants.

use crate::catalog::{Evaluation, FormulaCategory, FormulaSpec};
use crate::{CalculationResult, CalculatorInputs};

const CATEGORY: FormulaCategory = FormulaCategory::CompoundInterest;

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_ic_S_from_Pin",
        category: CATEGORY,
        output: "S",
        label: "Calcular Monto (S)",
        inputs: &["P", "i", "n"],
        optional: &[],
        template: "P * (1 + i)^n",
        eval: future_value,
    },
    FormulaSpec {
        name: "formula_ic_P_from_Sin",
        category: CATEGORY,
        output: "P",
        label: "Calcular Capital (P)",
        inputs: &["S", "i", "n"],
        optional: &[],
        template: "S * (1 + i)^-n",
        eval: present_value,
    },
    FormulaSpec {
        name: "formula_ic_I_from_Pin",
        category: CATEGORY,
        output: "I",
        label: "Calcular Interés (I)",
        inputs: &["P", "i", "n"],
        optional: &[],
        template: "P * ((1 + i)^n - 1)",
        eval: interest,
    },
    FormulaSpec {
        name: "formula_ic_P_from_Iin",
        category: CATEGORY,
        output: "P",
        label: "Calcular Capital (P) desde Interés",
        inputs: &["I", "i", "n"],
        optional: &[],
        template: "I / ((1 + i)^n - 1)",
        eval: principal_from_interest,
    },
    FormulaSpec {
        name: "formula_ic_n_from_SPi",
        category: CATEGORY,
        output: "n",
        label: "Calcular Tiempo (n)",
        inputs: &["S", "P", "i"],
        optional: &[],
        template: "log(S / P) / log(1 + i)",
        eval: term_from_amounts,
    },
    FormulaSpec {
        name: "formula_ic_i_from_SPn",
        category: CATEGORY,
        output: "i",
        label: "Calcular Tasa (i)",
        inputs: &["S", "P", "n"],
        optional: &[],
        template: "(S / P)^(1 / n) - 1",
        eval: rate_from_amounts,
    },
    FormulaSpec {
        name: "formula_ic_S_from_Pjm",
        category: CATEGORY,
        output: "S",
        label: "Calcular Monto (S) con Tasa Nominal",
        inputs: &["P", "j", "m", "n"],
        optional: &[],
        template: "P * (1 + j / m)^n",
        eval: future_value_nominal,
    },
    FormulaSpec {
        name: "formula_ic_P_from_Sjm",
        category: CATEGORY,
        output: "P",
        label: "Calcular Capital (P) con Tasa Nominal",
        inputs: &["S", "j", "m", "n"],
        optional: &[],
        template: "S * (1 + j / m)^-n",
        eval: present_value_nominal,
    },
    FormulaSpec {
        name: "formula_ic_n_from_IPi",
        category: CATEGORY,
        output: "n",
        label: "Calcular Tiempo (n) desde Interés",
        inputs: &["I", "P", "i"],
        optional: &[],
        template: "log(I / P + 1) / log(1 + i)",
        eval: term_from_interest,
    },
    FormulaSpec {
        name: "formula_ic_i_from_IPn",
        category: CATEGORY,
        output: "i",
        label: "Calcular Tasa (i) desde Interés",
        inputs: &["I", "P", "n"],
        optional: &[],
        template: "(I / P + 1)^(1 / n) - 1",
        eval: rate_from_interest,
    },
    FormulaSpec {
        name: "formula_ic_j_from_SPnm",
        category: CATEGORY,
        output: "j",
        label: "Calcular Tasa Nominal (j)",
        inputs: &["S", "P", "n", "m"],
        optional: &[],
        template: "m * ((S / P)^(1 / n) - 1)",
        eval: nominal_rate_from_amounts,
    },
];

fn future_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, i, n] = inputs.numbers(["P", "i", "n"])?;
    Ok(Evaluation::new(p * (1.0 + i).powf(n)))
}

fn present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, i, n] = inputs.numbers(["S", "i", "n"])?;
    Ok(Evaluation::new(s * (1.0 + i).powf(-n)))
}

fn interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, i, n] = inputs.numbers(["P", "i", "n"])?;
    Ok(Evaluation::new(p * ((1.0 + i).powf(n) - 1.0)))
}

fn principal_from_interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [interest, i, n] = inputs.numbers(["I", "i", "n"])?;
    Ok(Evaluation::new(interest / ((1.0 + i).powf(n) - 1.0)))
}

fn term_from_amounts(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, p, i] = inputs.numbers(["S", "P", "i"])?;
    Ok(Evaluation::new((s / p).ln() / (1.0 + i).ln()))
}

fn rate_from_amounts(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, p, n] = inputs.numbers(["S", "P", "n"])?;
    Ok(Evaluation::new((s / p).powf(1.0 / n) - 1.0))
}

fn future_value_nominal(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, j, m, n] = inputs.numbers(["P", "j", "m", "n"])?;
    Ok(Evaluation::new(p * (1.0 + j / m).powf(n)))
}

fn present_value_nominal(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, j, m, n] = inputs.numbers(["S", "j", "m", "n"])?;
    Ok(Evaluation::new(s * (1.0 + j / m).powf(-n)))
}

fn term_from_interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [interest, p, i] = inputs.numbers(["I", "P", "i"])?;
    Ok(Evaluation::new((interest / p + 1.0).ln() / (1.0 + i).ln()))
}

fn rate_from_interest(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [interest, p, n] = inputs.numbers(["I", "P", "n"])?;
    Ok(Evaluation::new((interest / p + 1.0).powf(1.0 / n) - 1.0))
}

fn nominal_rate_from_amounts(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, p, n, m] = inputs.numbers(["S", "P", "n", "m"])?;
    Ok(Evaluation::new(m * ((s / p).powf(1.0 / n) - 1.0)))
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
    fn test_future_and_present_value_are_inverse() {
        let s = run("formula_ic_S_from_Pin", &[("P", 1000.0), ("i", 0.05), ("n", 3.0)]);
        assert!((s - 1157.625).abs() < 1e-9);
        let p = run("formula_ic_P_from_Sin", &[("S", s), ("i", 0.05), ("n", 3.0)]);
        assert!((p - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_present_value_trace_keeps_negative_exponent() {
        let spec = &FORMULAS[1];
        let values = PlanInputs::from([
            ("S".to_string(), PlanValue::Number(1157.625)),
            ("i".to_string(), PlanValue::Number(0.05)),
            ("n".to_string(), PlanValue::Number(3.0)),
        ]);
        let outcome = spec.compute(&values).unwrap();
        assert!(outcome.substituted_formula.starts_with("1157.625 * (1 + 0.05)^-3 = "));
    }

    #[test]
    fn test_term_and_rate_recovery() {
        let n = run("formula_ic_n_from_SPi", &[("S", 1157.625), ("P", 1000.0), ("i", 0.05)]);
        assert!((n - 3.0).abs() < 1e-9);

        let i = run("formula_ic_i_from_SPn", &[("S", 1157.625), ("P", 1000.0), ("n", 3.0)]);
        assert!((i - 0.05).abs() < 1e-12);

        let n = run("formula_ic_n_from_IPi", &[("I", 157.625), ("P", 1000.0), ("i", 0.05)]);
        assert!((n - 3.0).abs() < 1e-9);

        let i = run("formula_ic_i_from_IPn", &[("I", 157.625), ("P", 1000.0), ("n", 3.0)]);
        assert!((i - 0.05).abs() < 1e-12);

        let p = run("formula_ic_P_from_Iin", &[("I", 157.625), ("i", 0.05), ("n", 3.0)]);
        assert!((p - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_nominal_rate_forms() {
        let s = run("formula_ic_S_from_Pjm", &[("P", 1000.0), ("j", 0.12), ("m", 12.0), ("n", 12.0)]);
        assert!((s - 1000.0 * 1.01_f64.powi(12)).abs() < 1e-9);

        let p = run("formula_ic_P_from_Sjm", &[("S", s), ("j", 0.12), ("m", 12.0), ("n", 12.0)]);
        assert!((p - 1000.0).abs() < 1e-9);

        let j = run("formula_ic_j_from_SPnm", &[("S", s), ("P", 1000.0), ("n", 12.0), ("m", 12.0)]);
        assert!((j - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_ratio_is_nan() {
        let n = run("formula_ic_n_from_SPi", &[("S", -100.0), ("P", 1000.0), ("i", 0.05)]);
        assert!(n.is_nan());
    }
}
