use crate::error::{FincalcError, FincalcResult};
use fincalc_types::{PlanInputs, PlanValue};

/// Variables visible to a plan while it runs.
///
/// Starts as a copy of the plan's `initial_data`; each executed step binds its
/// target variable, replacing any earlier value under the same name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableEnvironment {
    values: PlanInputs,
}

impl VariableEnvironment {
    pub fn new(initial_data: &PlanInputs) -> Self {
        Self { values: initial_data.clone() }
    }

    pub fn get(&self, name: &str) -> Option<&PlanValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Binds `name` to a step result and returns the value it replaced.
    pub fn bind(&mut self, name: &str, result: f64) -> Option<PlanValue> {
        self.values.insert(name.to_string(), PlanValue::Number(result))
    }

    /// Replaces every `{{name}}` input with the bound value; other inputs pass through.
    pub fn resolve(&self, inputs: &PlanInputs, step: &str) -> FincalcResult<PlanInputs> {
        inputs
            .iter()
            .map(|(parameter, value)| -> FincalcResult<(String, PlanValue)> {
                let resolved = match value.reference() {
                    Some(variable) => self.values.get(variable).cloned().ok_or_else(|| {
                        FincalcError::MissingVariable { variable: variable.to_string(), step: step.to_string() }
                    })?,
                    None => value.clone(),
                };
                Ok((parameter.clone(), resolved))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial() -> PlanInputs {
        PlanInputs::from([
            ("P".to_string(), PlanValue::Number(1000.0)),
            ("fecha_inicial".to_string(), PlanValue::from("2024-01-15")),
        ])
    }

    #[test]
    fn test_resolve_references_and_literals() {
        let env = VariableEnvironment::new(&initial());
        let inputs = PlanInputs::from([
            ("P".to_string(), PlanValue::reference_to("P")),
            ("j".to_string(), PlanValue::Number(0.1)),
            ("fecha".to_string(), PlanValue::reference_to("fecha_inicial")),
        ]);

        let resolved = env.resolve(&inputs, "Paso 1").unwrap();
        assert_eq!(resolved["P"], PlanValue::Number(1000.0));
        assert_eq!(resolved["j"], PlanValue::Number(0.1));
        assert_eq!(resolved["fecha"], PlanValue::from("2024-01-15"));
    }

    #[test]
    fn test_unresolved_reference_names_variable_and_step() {
        let env = VariableEnvironment::new(&initial());
        let inputs = PlanInputs::from([("S".to_string(), PlanValue::reference_to("S"))]);

        let err = env.resolve(&inputs, "Paso 2").unwrap_err();
        assert_eq!(err, FincalcError::MissingVariable { variable: "S".into(), step: "Paso 2".into() });
    }

    #[test]
    fn test_bind_shadows_previous_value() {
        let mut env = VariableEnvironment::new(&initial());
        assert_eq!(env.bind("i", 0.02), None);
        assert_eq!(env.bind("i", 0.03), Some(PlanValue::Number(0.02)));
        assert_eq!(env.get("i"), Some(&PlanValue::Number(0.03)));
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn test_braces_inside_text_are_not_references() {
        let env = VariableEnvironment::new(&PlanInputs::new());
        let inputs = PlanInputs::from([("nota".to_string(), PlanValue::from("ver {{P}} abajo"))]);
        let resolved = env.resolve(&inputs, "Paso 1").unwrap();
        assert_eq!(resolved["nota"], PlanValue::from("ver {{P}} abajo"));
    }
}
