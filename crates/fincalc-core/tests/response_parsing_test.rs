//! Plans recovered from raw model output.

use fincalc_core::{FincalcError, PlanExecutor, PlanValue, parse_plan_response, parse_plan_strict};

const FENCED_RESPONSE: &str = r#"Claro, este es el plan de cálculo:

```json
{
  "interpretation": "Se pide el valor futuro de una inversión a interés compuesto"
  "initial_data": {
    "P": 5000,
    "i": 0.015
    "n": 12
  },
  "final_target_variable": "S",
  "calculation_steps": [
    {
      "step_name": "Monto compuesto",
      "target_variable": "S",
      "formula_name": "formula_ic_S_from_Pin",
      "inputs": {
        "P": "{{P}}",
        "i": "{{i}}",
        "n": "{{n}}",
      }
    },
  ]
}
```

Espero que sea de ayuda."#;

#[test]
fn test_fenced_response_with_missing_and_trailing_commas() {
    let plan = parse_plan_response(FENCED_RESPONSE).unwrap();
    assert_eq!(plan.final_target_variable, "S");
    assert_eq!(plan.initial_data["i"], PlanValue::Number(0.015));
    assert_eq!(plan.calculation_steps.len(), 1);

    let report = PlanExecutor::new().run(&plan).unwrap();
    let expected = 5000.0 * 1.015_f64.powi(12);
    assert!((report.final_result.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_strict_parsing_rejects_what_lenient_repairs() {
    let start = FENCED_RESPONSE.find('{').unwrap();
    let end = FENCED_RESPONSE.rfind('}').unwrap();
    let err = parse_plan_strict(&FENCED_RESPONSE[start..=end]).unwrap_err();
    assert!(matches!(err, FincalcError::PlanParse { .. }));
}

#[test]
fn test_commas_inside_strings_are_preserved() {
    let raw = r#"{
        "interpretation": "Tasa, plazo y monto: {a, b,}",
        "final_target_variable": "x",
        "calculation_steps": []
    }"#;
    let plan = parse_plan_response(raw).unwrap();
    assert_eq!(plan.interpretation, "Tasa, plazo y monto: {a, b,}");
}

#[test]
fn test_response_without_object() {
    let err = parse_plan_response("No puedo resolver este problema.").unwrap_err();
    assert!(matches!(err, FincalcError::PlanParse { ref message } if message.contains("JSON object")));
}

#[test]
fn test_missing_required_field_is_parse_error() {
    let err = parse_plan_response(r#"{"interpretation": "sin pasos"}"#).unwrap_err();
    assert_eq!(err.category(), "parse");
}
