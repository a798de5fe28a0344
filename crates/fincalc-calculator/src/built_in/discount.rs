//! Rational discount and simple or compound bank discount.

use crate::catalog::{Evaluation, FormulaSpec};
use crate::{CalculationResult, CalculatorInputs};

use crate::catalog::FormulaCategory::{CompoundBankDiscount, RationalDiscount, SimpleBankDiscount};

pub static FORMULAS: &[FormulaSpec] = &[
    FormulaSpec {
        name: "formula_drs_D_from_Sjn",
        category: RationalDiscount,
        output: "D",
        label: "Calcular Descuento Racional Simple (D)",
        inputs: &["S", "j", "n"],
        optional: &[],
        template: "(S * j * n) / (1 + j * n)",
        eval: rational_simple_discount,
    },
    FormulaSpec {
        name: "formula_dr_D_from_Sin",
        category: RationalDiscount,
        output: "D",
        label: "Calcular Descuento Racional Compuesto (D)",
        inputs: &["S", "i", "n"],
        optional: &[],
        template: "S * (1 - (1 + i)^-n)",
        eval: rational_compound_discount,
    },
    FormulaSpec {
        name: "formula_dr_P_from_Sin",
        category: RationalDiscount,
        output: "P",
        label: "Calcular Valor Líquido (P)",
        inputs: &["S", "i", "n"],
        optional: &[],
        template: "S * (1 + i)^-n",
        eval: rational_net_value,
    },
    FormulaSpec {
        name: "formula_dbs_DB_from_Sdn",
        category: SimpleBankDiscount,
        output: "DB",
        label: "Calcular Descuento Bancario (DB)",
        inputs: &["S", "d", "n"],
        optional: &[],
        template: "S * d * n",
        eval: simple_bank_discount,
    },
    FormulaSpec {
        name: "formula_dbs_P_from_Sdn",
        category: SimpleBankDiscount,
        output: "P",
        label: "Calcular Valor Líquido (P)",
        inputs: &["S", "d", "n"],
        optional: &[],
        template: "S * (1 - d * n)",
        eval: simple_bank_net_value,
    },
    FormulaSpec {
        name: "formula_dbs_S_from_DBdn",
        category: SimpleBankDiscount,
        output: "S",
        label: "Calcular Valor Nominal (S)",
        inputs: &["DB", "d", "n"],
        optional: &[],
        template: "DB / (d * n)",
        eval: simple_bank_face_value,
    },
    FormulaSpec {
        name: "formula_dbs_d_from_DBSn",
        category: SimpleBankDiscount,
        output: "d",
        label: "Calcular Tasa de Descuento (d)",
        inputs: &["DB", "S", "n"],
        optional: &[],
        template: "DB / (S * n)",
        eval: simple_bank_rate,
    },
    FormulaSpec {
        name: "formula_dbs_n_from_DBSd",
        category: SimpleBankDiscount,
        output: "n",
        label: "Calcular Tiempo (n)",
        inputs: &["DB", "S", "d"],
        optional: &[],
        template: "DB / (S * d)",
        eval: simple_bank_term,
    },
    FormulaSpec {
        name: "formula_db_DB_from_Sden",
        category: CompoundBankDiscount,
        output: "DB",
        label: "Calcular Descuento Bancario (DB)",
        inputs: &["S", "de", "n"],
        optional: &[],
        template: "S * (1 - (1 - de)^n)",
        eval: compound_bank_discount,
    },
    FormulaSpec {
        name: "formula_db_P_from_Sden",
        category: CompoundBankDiscount,
        output: "P",
        label: "Calcular Valor Líquido (P)",
        inputs: &["S", "de", "n"],
        optional: &[],
        template: "S * (1 - de)^n",
        eval: compound_bank_net_value,
    },
    FormulaSpec {
        name: "formula_db_S_from_DBden",
        category: CompoundBankDiscount,
        output: "S",
        label: "Calcular Valor Nominal (S)",
        inputs: &["DB", "de", "n"],
        optional: &[],
        template: "DB / (1 - (1 - de)^n)",
        eval: compound_bank_face_value,
    },
    FormulaSpec {
        name: "formula_db_de_from_DBSn",
        category: CompoundBankDiscount,
        output: "de",
        label: "Calcular Tasa de Descuento (de) desde Descuento",
        inputs: &["DB", "S", "n"],
        optional: &[],
        template: "1 - (1 - DB / S)^(1 / n)",
        eval: compound_bank_rate_from_discount,
    },
    FormulaSpec {
        name: "formula_db_de_from_Psn",
        category: CompoundBankDiscount,
        output: "de",
        label: "Calcular Tasa de Descuento (de) desde Valor Líquido",
        inputs: &["P", "S", "n"],
        optional: &[],
        template: "1 - (P / S)^(1 / n)",
        eval: compound_bank_rate_from_net_value,
    },
    FormulaSpec {
        name: "formula_db_n_from_DBSde",
        category: CompoundBankDiscount,
        output: "n",
        label: "Calcular Tiempo (n)",
        inputs: &["DB", "S", "de"],
        optional: &[],
        template: "log(1 - DB / S) / log(1 - de)",
        eval: compound_bank_term,
    },
];

fn rational_simple_discount(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, j, n] = inputs.numbers(["S", "j", "n"])?;
    Ok(Evaluation::new((s * j * n) / (1.0 + j * n)))
}

fn rational_compound_discount(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, i, n] = inputs.numbers(["S", "i", "n"])?;
    Ok(Evaluation::new(s * (1.0 - (1.0 + i).powf(-n))))
}

fn rational_net_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, i, n] = inputs.numbers(["S", "i", "n"])?;
    Ok(Evaluation::new(s * (1.0 + i).powf(-n)))
}

fn simple_bank_discount(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, d, n] = inputs.numbers(["S", "d", "n"])?;
    Ok(Evaluation::new(s * d * n))
}

fn simple_bank_net_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, d, n] = inputs.numbers(["S", "d", "n"])?;
    Ok(Evaluation::new(s * (1.0 - d * n)))
}

fn simple_bank_face_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [discount, d, n] = inputs.numbers(["DB", "d", "n"])?;
    Ok(Evaluation::new(discount / (d * n)))
}

fn simple_bank_rate(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [discount, s, n] = inputs.numbers(["DB", "S", "n"])?;
    Ok(Evaluation::new(discount / (s * n)))
}

fn simple_bank_term(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [discount, s, d] = inputs.numbers(["DB", "S", "d"])?;
    Ok(Evaluation::new(discount / (s * d)))
}

fn compound_bank_discount(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, de, n] = inputs.numbers(["S", "de", "n"])?;
    Ok(Evaluation::new(s * (1.0 - (1.0 - de).powf(n))))
}

fn compound_bank_net_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [s, de, n] = inputs.numbers(["S", "de", "n"])?;
    Ok(Evaluation::new(s * (1.0 - de).powf(n)))
}

fn compound_bank_face_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [discount, de, n] = inputs.numbers(["DB", "de", "n"])?;
    Ok(Evaluation::new(discount / (1.0 - (1.0 - de).powf(n))))
}

fn compound_bank_rate_from_discount(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [discount, s, n] = inputs.numbers(["DB", "S", "n"])?;
    Ok(Evaluation::new(1.0 - (1.0 - discount / s).powf(1.0 / n)))
}

fn compound_bank_rate_from_net_value(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [p, s, n] = inputs.numbers(["P", "S", "n"])?;
    Ok(Evaluation::new(1.0 - (p / s).powf(1.0 / n)))
}

fn compound_bank_term(inputs: &CalculatorInputs) -> CalculationResult<Evaluation> {
    let [discount, s, de] = inputs.numbers(["DB", "S", "de"])?;
    Ok(Evaluation::new((1.0 - discount / s).ln() / (1.0 - de).ln()))
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
    fn test_rational_discount_plus_net_value_is_face_value() {
        let d = run("formula_dr_D_from_Sin", &[("S", 10_000.0), ("i", 0.02), ("n", 6.0)]);
        let p = run("formula_dr_P_from_Sin", &[("S", 10_000.0), ("i", 0.02), ("n", 6.0)]);
        assert!((d + p - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_rational_simple_discount() {
        let d = run("formula_drs_D_from_Sjn", &[("S", 1100.0), ("j", 0.1), ("n", 1.0)]);
        assert!((d - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_simple_bank_discount_round_trip() {
        let db = run("formula_dbs_DB_from_Sdn", &[("S", 8000.0), ("d", 0.12), ("n", 0.25)]);
        assert!((db - 240.0).abs() < 1e-9);

        let p = run("formula_dbs_P_from_Sdn", &[("S", 8000.0), ("d", 0.12), ("n", 0.25)]);
        assert!((p - 7760.0).abs() < 1e-9);

        let s = run("formula_dbs_S_from_DBdn", &[("DB", 240.0), ("d", 0.12), ("n", 0.25)]);
        assert!((s - 8000.0).abs() < 1e-9);

        let d = run("formula_dbs_d_from_DBSn", &[("DB", 240.0), ("S", 8000.0), ("n", 0.25)]);
        assert!((d - 0.12).abs() < 1e-12);

        let n = run("formula_dbs_n_from_DBSd", &[("DB", 240.0), ("S", 8000.0), ("d", 0.12)]);
        assert!((n - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_compound_bank_discount_round_trip() {
        let db = run("formula_db_DB_from_Sden", &[("S", 5000.0), ("de", 0.03), ("n", 4.0)]);
        let p = run("formula_db_P_from_Sden", &[("S", 5000.0), ("de", 0.03), ("n", 4.0)]);
        assert!((db + p - 5000.0).abs() < 1e-9);

        let s = run("formula_db_S_from_DBden", &[("DB", db), ("de", 0.03), ("n", 4.0)]);
        assert!((s - 5000.0).abs() < 1e-9);

        let de = run("formula_db_de_from_DBSn", &[("DB", db), ("S", 5000.0), ("n", 4.0)]);
        assert!((de - 0.03).abs() < 1e-12);

        let de = run("formula_db_de_from_Psn", &[("P", p), ("S", 5000.0), ("n", 4.0)]);
        assert!((de - 0.03).abs() < 1e-12);

        let n = run("formula_db_n_from_DBSde", &[("DB", db), ("S", 5000.0), ("de", 0.03)]);
        assert!((n - 4.0).abs() < 1e-9);
    }
}
