//! Single-formula plans for the manual calculator.

use crate::error::{FincalcError, FincalcResult};
use fincalc_calculator::FormulaCatalog;
use fincalc_types::{CalculationPlan, CalculationStep, PlanInputs, PlanValue};

/// Prefix of the interpretation given to manual plans.
pub const MANUAL_INTERPRETATION_PREFIX: &str = "Cálculo manual de: ";

/// Builds a one-step plan applying `formula_name` to `inputs`.
///
/// The step and final target are the formula's conventional output name.
/// Non-finite numbers and missing required inputs are rejected here, before
/// any plan exists.
pub fn manual_plan(
    catalog: &FormulaCatalog,
    formula_name: &str,
    inputs: PlanInputs,
) -> FincalcResult<CalculationPlan> {
    let spec = catalog.get(formula_name).ok_or_else(|| FincalcError::UnknownFormula {
        formula: formula_name.to_string(),
        step: format!("{MANUAL_INTERPRETATION_PREFIX}{formula_name}"),
    })?;

    if let Some((name, value)) = inputs
        .iter()
        .find(|(_, value)| matches!(value, PlanValue::Number(n) if !n.is_finite()))
    {
        return Err(FincalcError::ManualInput {
            input: name.clone(),
            message: format!("expected a finite number, got {value}"),
        });
    }

    if let Some(missing) = spec.inputs.iter().find(|name| !inputs.contains_key(**name)) {
        return Err(FincalcError::MissingInput {
            formula: spec.name.to_string(),
            input: (*missing).to_string(),
            step: spec.label.to_string(),
        });
    }

    let step = CalculationStep {
        inputs: inputs.clone(),
        ..CalculationStep::new(spec.label, spec.output, spec.name)
    };

    Ok(CalculationPlan {
        interpretation: format!("{MANUAL_INTERPRETATION_PREFIX}{}", spec.label),
        initial_data: inputs,
        final_target_variable: spec.output.to_string(),
        calculation_steps: vec![step],
    })
}

/// Parses `NAME=VALUE` pairs; values that are not numbers are kept as text.
pub fn parse_assignments<'a>(pairs: impl IntoIterator<Item = &'a str>) -> FincalcResult<PlanInputs> {
    pairs
        .into_iter()
        .map(|pair| -> FincalcResult<(String, PlanValue)> {
            let (name, value) = pair.split_once('=').ok_or_else(|| FincalcError::ManualInput {
                input: pair.to_string(),
                message: "expected NAME=VALUE".to_string(),
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(FincalcError::ManualInput {
                    input: pair.to_string(),
                    message: "variable name is empty".to_string(),
                });
            }
            let value = value.trim();
            let value = match value.parse::<f64>() {
                Ok(number) => PlanValue::Number(number),
                Err(_) => PlanValue::Text(value.to_string()),
            };
            Ok((name.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlanExecutor;

    #[test]
    fn test_manual_plan_shape() {
        let executor = PlanExecutor::new();
        let inputs = parse_assignments(["R=100", "i=0.05", "n=3"]).unwrap();
        let plan = manual_plan(executor.catalog(), "formula_av_S_from_Rin", inputs).unwrap();

        assert_eq!(plan.interpretation, "Cálculo manual de: Calcular Valor Futuro (S)");
        assert_eq!(plan.final_target_variable, "S");
        assert_eq!(plan.calculation_steps.len(), 1);
        assert_eq!(plan.calculation_steps[0].formula_name, "formula_av_S_from_Rin");
        assert_eq!(plan.calculation_steps[0].inputs, plan.initial_data);

        let report = executor.run(&plan).unwrap();
        assert!((report.final_result.unwrap() - 315.25).abs() < 1e-9);
    }

    #[test]
    fn test_manual_plan_rejects_non_finite_and_missing_inputs() {
        let catalog = FormulaCatalog::new();
        let inputs = PlanInputs::from([
            ("R".to_string(), PlanValue::Number(f64::NAN)),
            ("i".to_string(), PlanValue::Number(0.05)),
            ("n".to_string(), PlanValue::Number(3.0)),
        ]);
        let err = manual_plan(&catalog, "formula_av_S_from_Rin", inputs).unwrap_err();
        assert!(matches!(err, FincalcError::ManualInput { ref input, .. } if input == "R"));

        let inputs = parse_assignments(["R=100"]).unwrap();
        let err = manual_plan(&catalog, "formula_av_S_from_Rin", inputs).unwrap_err();
        assert!(matches!(err, FincalcError::MissingInput { ref input, .. } if input == "i"));
    }

    #[test]
    fn test_manual_plan_unknown_formula() {
        let err = manual_plan(&FormulaCatalog::new(), "formula_nope", PlanInputs::new()).unwrap_err();
        assert!(matches!(err, FincalcError::UnknownFormula { .. }));
    }

    #[test]
    fn test_parse_assignments() {
        let values = parse_assignments(["P = 1000", "fecha_inicial=2024-01-15"]).unwrap();
        assert_eq!(values["P"], PlanValue::Number(1000.0));
        assert_eq!(values["fecha_inicial"], PlanValue::from("2024-01-15"));
        assert!(parse_assignments(["P"]).is_err());
        assert!(parse_assignments(["=3"]).is_err());
    }
}
