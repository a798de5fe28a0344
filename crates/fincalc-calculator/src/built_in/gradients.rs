//! Arithmetic and geometric gradient series.

use crate::catalog::{Evaluation, FormulaSpec};
use crate::{CalculationResult, CalculatorInputs};

use crate::catalog::FormulaCategory::{ArithmeticGradient, GeometricGradient};

/// Note appended to traces computed with the `g == i` branch.
pub const EQUAL_RATES_NOTE: &str = "caso especial g=i";

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_ga_P_from_Gin",
        category: ArithmeticGradient,
        output: "P",
        label: "Calcular Valor Presente del Gradiente (P)",
        inputs: &["G", "i", "n"],
        optional: &[],
        template: "(G / i) * (((1 - (1 + i)^-n) / i) - (n * (1 + i)^-n))",
        eval: arithmetic_present_value,
    },
    FormulaSpec {
        name: "formula_ga_S_from_Gin",
        category: ArithmeticGradient,
        output: "S",
        label: "Calcular Valor Futuro del Gradiente (S)",
        inputs: &["G", "i", "n"],
        optional: &[],
        template: "(G / i) * ((((1 + i)^n - 1) / i) - n)",
        eval: arithmetic_future_value,
    },
    FormulaSpec {
        name: "formula_ga_R_from_Gin",
        category: ArithmeticGradient,
        output: "R_eq",
        label: "Calcular Renta Equivalente (R)",
        inputs: &["G", "i", "n"],
        optional: &[],
        template: "G * (1 / i - n / ((1 + i)^n - 1))",
        eval: arithmetic_equivalent_payment,
    },
    FormulaSpec {
        name: "formula_gg_P_from_Rgin",
        category: GeometricGradient,
        output: "P",
        label: "Calcular Valor Presente (P)",
        inputs: &["R", "g", "i", "n"],
        optional: &[],
        template: "R * ((1 - ((1 + g) / (1 + i))^n) / (i - g))",
        eval: geometric_present_value,
    },
    FormulaSpec {
        name: "formula_gg_S_from_Rgin",
        category: GeometricGradient,
        output: "S",
        label: "Calcular Valor Futuro (S)",
        inputs: &["R", "g", "i", "n"],
        optional: &[],
        template: "R * (((1 + i)^n - (1 + g)^n) / (i - g))",
        eval: geometric_future_value,
    },
];

fn arithmetic_present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [gradient, i, n] = inputs.numbers(["G", "i", "n"])?;
    let discount = (1.0 + i).powf(-n);
    Ok(Evaluation::new((gradient / i) * ((1.0 - discount) / i - n * discount)))
}

fn arithmetic_future_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [gradient, i, n] = inputs.numbers(["G", "i", "n"])?;
    Ok(Evaluation::new((gradient / i) * (((1.0 + i).powf(n) - 1.0) / i - n)))
}

fn arithmetic_equivalent_payment(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [gradient, i, n] = inputs.numbers(["G", "i", "n"])?;
    Ok(Evaluation::new(gradient * (1.0 / i - n / ((1.0 + i).powf(n) - 1.0))))
}

// Exact equality: rates that differ by rounding go through the general form.
fn geometric_present_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, g, i, n] = inputs.numbers(["R", "g", "i", "n"])?;
    if i == g {
        return Ok(Evaluation::special_case(n * r / (1.0 + i), "n * R / (1 + i)", EQUAL_RATES_NOTE));
    }
    Ok(Evaluation::new(r * ((1.0 - ((1.0 + g) / (1.0 + i)).powf(n)) / (i - g))))
}

fn geometric_future_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [r, g, i, n] = inputs.numbers(["R", "g", "i", "n"])?;
    if i == g {
        return Ok(Evaluation::special_case(
            n * r * (1.0 + i).powf(n - 1.0),
            "n * R * (1 + i)^(n - 1)",
            EQUAL_RATES_NOTE,
        ));
    }
    Ok(Evaluation::new(r * (((1.0 + i).powf(n) - (1.0 + g).powf(n)) / (i - g))))
}
