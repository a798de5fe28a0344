//! Day counts and commercial year fractions.

use chrono::NaiveDate;

use crate::catalog::{Evaluation, FormulaCategory, FormulaSpec};
use crate::{CalculationResult, CalculatorInputs};

/// Dates are ISO calendar dates, read as local midnight.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days in the commercial year.
pub const COMMERCIAL_YEAR_DAYS: f64 = 360.0;

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_util_dias_entre_fechas",
        category: FormulaCategory::Utility,
        output: "n_dias",
        label: "Calcular Días entre Fechas",
        inputs: &["fecha_inicial", "fecha_final"],
        optional: &[],
        template: "DiasEntre(fecha_final, fecha_inicial)",
        eval: days_between,
    },
    FormulaSpec {
        name: "formula_util_fraccion_anio",
        category: FormulaCategory::Utility,
        output: "n",
        label: "Calcular Fracción de Año (n)",
        inputs: &["n_dias"],
        optional: &[],
        template: "n_dias / 360",
        eval: year_fraction,
    },
];

/// Whole days between two dates, rounded up and never negative.
///
/// An unparsable date yields NaN, which the executor reports as an invalid result.
fn days_between(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let start = inputs.get_text("fecha_inicial")?;
    let end = inputs.get_text("fecha_final")?;

    let days = match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => (end - start).num_days().abs() as f64,
        _ => f64::NAN,
    };
    Ok(Evaluation::new(days.ceil()))
}

fn year_fraction(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let days = inputs.get_f64("n_dias")?;
    Ok(Evaluation::new(days / COMMERCIAL_YEAR_DAYS))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}
