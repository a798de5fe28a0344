//! Ordinary, due and deferred annuities with constant payments.

use crate::catalog::{Evaluation, FormulaSpec};
use crate::{CalculationResult, CalculatorInputs};

use crate::catalog::FormulaCategory::{DeferredAnnuity, DueAnnuity, OrdinaryAnnuity};

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_av_S_from_Rin",
        category: OrdinaryAnnuity,
        output: "S",
        label: "Calcular Valor Futuro (S)",
        inputs: &["R", "i", "n"],
        optional: &[],
        template: "R * ((1 + i)^n - 1) / i",
        eval: ordinary_future_value,
    },
    FormulaSpec {
        name: "formula_av_P_from_Rin",
        category: OrdinaryAnnuity,
        output: "P",
        label: "Calcular Valor Presente (P)",
        inputs: &["R", "i", "n"],
        optional: &[],
        template: "R * (1 - (1 + i)^-n) / i",
        eval: ordinary_present_value,
    },
    FormulaSpec {
        name: "formula_av_R_from_Sin",
        category: OrdinaryAnnuity,
        output: "R",
        label: "Calcular Renta (R) desde Valor Futuro",
        inputs: &["S", "i", "n"],
        optional: &[],
        template: "S * (i / ((1 + i)^n - 1))",
        eval: ordinary_payment_from_future,
    },
    FormulaSpec {
        name: "formula_av_R_from_Pin",
        category: OrdinaryAnnuity,
        output: "R",
        label: "Calcular Renta (R) desde Valor Presente",
        inputs: &["P", "i", "n"],
        optional: &[],
        template: "P * (i / (1 - (1 + i)^-n))",
        eval: ordinary_payment_from_present,
    },
    FormulaSpec {
        name: "formula_av_n_from_SRi",
        category: OrdinaryAnnuity,
        output: "n",
        label: "Calcular Número de Rentas (n) desde Valor Futuro",
        inputs: &["S", "R", "i"],
        optional: &[],
        template: "log((S * i / R) + 1) / log(1 + i)",
        eval: ordinary_term_from_future,
    },
    FormulaSpec {
        name: "formula_av_n_from_PRi",
        category: OrdinaryAnnuity,
        output: "n",
        label: "Calcular Número de Rentas (n) desde Valor Presente",
        inputs: &["P", "R", "i"],
        optional: &[],
        template: "-log(1 - (P * i / R)) / log(1 + i)",
        eval: ordinary_term_from_present,
    },
    FormulaSpec {
        name: "formula_aa_S_from_Rin",
        category: DueAnnuity,
        output: "S",
        label: "Calcular Valor Futuro (S)",
        inputs: &["R", "i", "n"],
        optional: &[],
        template: "R * (((1 + i)^n - 1) / i) * (1 + i)",
        eval: due_future_value,
    },
    FormulaSpec {
        name: "formula_aa_P_from_Rin",
        category: DueAnnuity,
        output: "P",
        label: "Calcular Valor Presente (P)",
        inputs: &["R", "i", "n"],
        optional: &[],
        template: "R * ((1 - (1 + i)^-n) / i) * (1 + i)",
        eval: due_present_value,
    },
    FormulaSpec {
        name: "formula_aa_R_from_Sin",
        category: DueAnnuity,
        output: "R",
        label: "Calcular Renta (R) desde Valor Futuro",
        inputs: &["S", "i", "n"],
        optional: &[],
        template: "(S / (1 + i)) * (i / ((1 + i)^n - 1))",
        eval: due_payment_from_future,
    },
    FormulaSpec {
        name: "formula_aa_R_from_Pin",
        category: DueAnnuity,
        output: "R",
        label: "Calcular Renta (R) desde Valor Presente",
        inputs: &["P", "i", "n"],
        optional: &[],
        template: "(P / (1 + i)) * (i / (1 - (1 + i)^-n))",
        eval: due_payment_from_present,
    },
    FormulaSpec {
        name: "formula_adv_P_from_Rink",
        category: DeferredAnnuity,
        output: "P",
        label: "Calcular Valor Presente (P) Vencida",
        inputs: &["R", "i", "n", "k"],
        optional: &[],
        template: "R * ((1 - (1 + i)^-n) / i) * (1 + i)^-k",
        eval: deferred_ordinary_present_value,
    },
    FormulaSpec {
        name: "formula_ada_P_from_Rink",
        category: DeferredAnnuity,
        output: "P",
        label: "Calcular Valor Presente (P) Anticipada",
        inputs: &["R", "i", "n", "k"],
        optional: &[],
        template: "R * ((1 - (1 + i)^-n) / i) * (1 + i) * (1 + i)^-k",
        eval: deferred_due_present_value,
    },
    FormulaSpec {
        name: "formula_adv_n_from_PRik",
        category: DeferredAnnuity,
        output: "n",
        label: "Calcular Número de Rentas (n)",
        inputs: &["P", "R", "i", "k"],
        optional: &[],
        template: "-log(1 - (P * (1 + i)^k * i / R)) / log(1 + i)",
        eval: deferred_term,
    },
    FormulaSpec {
        name: "formula_adv_k_from_PRin",
        category: DeferredAnnuity,
        output: "k",
        label: "Calcular Periodo de Diferimiento (k)",
        inputs: &["P", "R", "i", "n"],
        optional: &[],
        template: "log(R * (1 - (1 + i)^-n) / (P * i)) / log(1 + i)",
        eval: deferral_periods,
    },
];

/// Present value of one unit paid at the end of each of `n` periods.
pub(crate) fn present_value_factor(i: f64, n: f64) -> f64 {
    (1.0 - (1.0 + i).powf(-n)) / i
}

/// Future value of one unit paid at the end of each of `n` periods.
pub(crate) fn future_value_factor(i: f64, n: f64) -> f64 {
    ((1.0 + i).powf(n) - 1.0) / i
}

fn ordinary_future_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, i, n] = inputs.numbers(["R", "i", "n"])?;
    Ok(Evaluation::new(r * future_value_factor(i, n)))
}

fn ordinary_present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, i, n] = inputs.numbers(["R", "i", "n"])?;
    Ok(Evaluation::new(r * present_value_factor(i, n)))
}

fn ordinary_payment_from_future(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, i, n] = inputs.numbers(["S", "i", "n"])?;
    Ok(Evaluation::new(s * (i / ((1.0 + i).powf(n) - 1.0))))
}

fn ordinary_payment_from_present(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, i, n] = inputs.numbers(["P", "i", "n"])?;
    Ok(Evaluation::new(p * (i / (1.0 - (1.0 + i).powf(-n)))))
}

fn ordinary_term_from_future(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, r, i] = inputs.numbers(["S", "R", "i"])?;
    Ok(Evaluation::new((s * i / r + 1.0).ln() / (1.0 + i).ln()))
}

fn ordinary_term_from_present(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, r, i] = inputs.numbers(["P", "R", "i"])?;
    Ok(Evaluation::new(-(1.0 - p * i / r).ln() / (1.0 + i).ln()))
}

fn due_future_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, i, n] = inputs.numbers(["R", "i", "n"])?;
    Ok(Evaluation::new(r * future_value_factor(i, n) * (1.0 + i)))
}

fn due_present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, i, n] = inputs.numbers(["R", "i", "n"])?;
    Ok(Evaluation::new(r * present_value_factor(i, n) * (1.0 + i)))
}

fn due_payment_from_future(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, i, n] = inputs.numbers(["S", "i", "n"])?;
    Ok(Evaluation::new((s / (1.0 + i)) * (i / ((1.0 + i).powf(n) - 1.0))))
}

fn due_payment_from_present(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, i, n] = inputs.numbers(["P", "i", "n"])?;
    Ok(Evaluation::new((p / (1.0 + i)) * (i / (1.0 - (1.0 + i).powf(-n)))))
}

fn deferred_ordinary_present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, i, n, k] = inputs.numbers(["R", "i", "n", "k"])?;
    Ok(Evaluation::new(r * present_value_factor(i, n) * (1.0 + i).powf(-k)))
}

fn deferred_due_present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, i, n, k] = inputs.numbers(["R", "i", "n", "k"])?;
    Ok(Evaluation::new(r * present_value_factor(i, n) * (1.0 + i) * (1.0 + i).powf(-k)))
}

fn deferred_term(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, r, i, k] = inputs.numbers(["P", "R", "i", "k"])?;
    Ok(Evaluation::new(-(1.0 - p * (1.0 + i).powf(k) * i / r).ln() / (1.0 + i).ln()))
}

fn deferral_periods(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, r, i, n] = inputs.numbers(["P", "R", "i", "n"])?;
    Ok(Evaluation::new((r * (1.0 - (1.0 + i).powf(-n)) / (p * i)).ln() / (1.0 + i).ln()))
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
    fn test_ordinary_annuity_values() {
        let s = run("formula_av_S_from_Rin", &[("R", 100.0), ("i", 0.05), ("n", 3.0)]);
        assert!((s - 315.25).abs() < 1e-9);

        let p = run("formula_av_P_from_Rin", &[("R", 100.0), ("i", 0.05), ("n", 3.0)]);
        assert!((p - 272.324_802_937_047_9).abs() < 1e-9);
    }

    #[test]
    fn test_ordinary_annuity_inverses() {
        let r = run("formula_av_R_from_Sin", &[("S", 315.25), ("i", 0.05), ("n", 3.0)]);
        assert!((r - 100.0).abs() < 1e-9);

        let p = run("formula_av_P_from_Rin", &[("R", 100.0), ("i", 0.05), ("n", 3.0)]);
        let r = run("formula_av_R_from_Pin", &[("P", p), ("i", 0.05), ("n", 3.0)]);
        assert!((r - 100.0).abs() < 1e-9);

        let n = run("formula_av_n_from_SRi", &[("S", 315.25), ("R", 100.0), ("i", 0.05)]);
        assert!((n - 3.0).abs() < 1e-9);

        let n = run("formula_av_n_from_PRi", &[("P", p), ("R", 100.0), ("i", 0.05)]);
        assert!((n - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_due_annuity_is_ordinary_times_one_period() {
        let ordinary = run("formula_av_S_from_Rin", &[("R", 250.0), ("i", 0.03), ("n", 10.0)]);
        let due = run("formula_aa_S_from_Rin", &[("R", 250.0), ("i", 0.03), ("n", 10.0)]);
        assert!((due - ordinary * 1.03).abs() < 1e-9);

        let ordinary = run("formula_av_P_from_Rin", &[("R", 250.0), ("i", 0.03), ("n", 10.0)]);
        let due = run("formula_aa_P_from_Rin", &[("R", 250.0), ("i", 0.03), ("n", 10.0)]);
        assert!((due - ordinary * 1.03).abs() < 1e-9);

        let r = run("formula_aa_R_from_Sin", &[("S", ordinary * 1.03_f64.powi(10) * 1.03), ("i", 0.03), ("n", 10.0)]);
        assert!((r - 250.0).abs() < 1e-6);

        let r = run("formula_aa_R_from_Pin", &[("P", due), ("i", 0.03), ("n", 10.0)]);
        assert!((r - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_deferred_annuity_round_trip() {
        let p = run("formula_adv_P_from_Rink", &[("R", 500.0), ("i", 0.04), ("n", 8.0), ("k", 3.0)]);
        let n = run("formula_adv_n_from_PRik", &[("P", p), ("R", 500.0), ("i", 0.04), ("k", 3.0)]);
        assert!((n - 8.0).abs() < 1e-9);

        let k = run("formula_adv_k_from_PRin", &[("P", p), ("R", 500.0), ("i", 0.04), ("n", 8.0)]);
        assert!((k - 3.0).abs() < 1e-9);

        let due = run("formula_ada_P_from_Rink", &[("R", 500.0), ("i", 0.04), ("n", 8.0), ("k", 3.0)]);
        assert!((due - p * 1.04).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_is_nan() {
        let s = run("formula_av_S_from_Rin", &[("R", 100.0), ("i", 0.0), ("n", 3.0)]);
        assert!(s.is_nan());
    }
}
