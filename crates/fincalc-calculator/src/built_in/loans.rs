//! French amortization schedule quantities for installment `N` of `n`.

use crate::catalog::{Evaluation, FormulaCategory, FormulaSpec};
use crate::{CalculationResult, CalculatorInputs};

const CATEGORY: FormulaCategory = FormulaCategory::Loan;

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_prestamo_saldo_N",
        category: CATEGORY,
        output: "Saldo_N",
        label: "Calcular Saldo después de la cuota N",
        inputs: &["P", "i", "n", "N"],
        optional: &[],
        template: "P * (((1 + i)^n - (1 + i)^N) / ((1 + i)^n - 1))",
        eval: balance,
    },
    FormulaSpec {
        name: "formula_prestamo_amortizacion_N",
        category: CATEGORY,
        output: "Amortizacion_N",
        label: "Calcular Amortización de la cuota N",
        inputs: &["P", "i", "n", "N"],
        optional: &[],
        template: "(P * i / (1 - (1 + i)^-n)) * (1 + i)^(N - 1 - n)",
        eval: principal_portion,
    },
    FormulaSpec {
        name: "formula_prestamo_interes_N",
        category: CATEGORY,
        output: "Interes_N",
        label: "Calcular Interés de la cuota N",
        inputs: &["P", "i", "n", "N"],
        optional: &[],
        template: "(P * i / (1 - (1 + i)^-n)) * (1 - (1 + i)^(N - 1 - n))",
        eval: interest_portion,
    },
];

fn installment(p: f64, i: f64, n: f64) -> f64 {
    p * (i / (1.0 - (1.0 + i).powf(-n)))
}

fn balance(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, i, n, installment_number] = inputs.numbers(["P", "i", "n", "N"])?;
    let growth = (1.0 + i).powf(n);
    Ok(Evaluation::new(p * ((growth - (1.0 + i).powf(installment_number)) / (growth - 1.0))))
}

fn principal_portion(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, i, n, installment_number] = inputs.numbers(["P", "i", "n", "N"])?;
    Ok(Evaluation::new(installment(p, i, n) * (1.0 + i).powf(installment_number - 1.0 - n)))
}

fn interest_portion(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, i, n, installment_number] = inputs.numbers(["P", "i", "n", "N"])?;
    Ok(Evaluation::new(installment(p, i, n) * (1.0 - (1.0 + i).powf(installment_number - 1.0 - n))))
}
