use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named inputs of a plan or step. Ordered so traces and serialised output are stable.
pub type PlanInputs = BTreeMap<String, PlanValue>;

/// A literal value carried by a plan: a number, or text (ISO dates and
/// `{{name}}` back-references).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PlanValue {
    Number(f64),
    Text(String),
}

impl From<f64> for PlanValue {
    fn from(value: f64) -> Self {
        PlanValue::Number(value)
    }
}

impl From<i64> for PlanValue {
    fn from(value: i64) -> Self {
        PlanValue::Number(value as f64)
    }
}

impl From<String> for PlanValue {
    fn from(value: String) -> Self {
        PlanValue::Text(value)
    }
}

impl From<&str> for PlanValue {
    fn from(value: &str) -> Self {
        PlanValue::Text(value.to_string())
    }
}

impl fmt::Display for PlanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanValue::Number(n) => write!(f, "{}", format_number(*n)),
            PlanValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl PlanValue {
    /// Builds the `{{name}}` back-reference token for `name`.
    pub fn reference_to(name: &str) -> Self {
        PlanValue::Text(format!("{{{{{name}}}}}"))
    }

    /// Name referenced by a `{{name}}` token, if this value is exactly one.
    pub fn reference(&self) -> Option<&str> {
        match self {
            PlanValue::Text(s) if s.len() >= 4 && s.starts_with("{{") && s.ends_with("}}") => {
                Some(&s[2..s.len() - 2])
            }
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PlanValue::Number(n) => Some(*n),
            PlanValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PlanValue::Text(s) => Some(s),
            PlanValue::Number(_) => None,
        }
    }
}

/// Renders a number for display traces. Integral values print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// One formula application within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationStep {
    pub step_name: String,
    /// Name under which the result is bound for later steps.
    pub target_variable: String,
    pub formula_name: String,
    #[serde(default)]
    pub inputs: PlanInputs,
    /// Arithmetic expression, only meaningful for the experimental formula.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_formula: Option<String>,
}

impl CalculationStep {
    pub fn new(
        step_name: impl Into<String>,
        target_variable: impl Into<String>,
        formula_name: impl Into<String>,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            target_variable: target_variable.into(),
            formula_name: formula_name.into(),
            inputs: PlanInputs::new(),
            generated_formula: None,
        }
    }

    /// Adds an input, builder style.
    pub fn with_input(mut self, name: &str, value: impl Into<PlanValue>) -> Self {
        self.inputs.insert(name.to_string(), value.into());
        self
    }

    pub fn with_generated_formula(mut self, expression: impl Into<String>) -> Self {
        self.generated_formula = Some(expression.into());
        self
    }
}

/// Declarative description of which formulas to apply, in what order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationPlan {
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub initial_data: PlanInputs,
    pub final_target_variable: String,
    pub calculation_steps: Vec<CalculationStep>,
}

impl CalculationPlan {
    pub fn new(final_target_variable: impl Into<String>) -> Self {
        Self {
            interpretation: String::new(),
            initial_data: PlanInputs::new(),
            final_target_variable: final_target_variable.into(),
            calculation_steps: Vec::new(),
        }
    }

    pub fn with_interpretation(mut self, interpretation: impl Into<String>) -> Self {
        self.interpretation = interpretation.into();
        self
    }

    pub fn with_initial(mut self, name: &str, value: impl Into<PlanValue>) -> Self {
        self.initial_data.insert(name.to_string(), value.into());
        self
    }

    pub fn with_step(mut self, step: CalculationStep) -> Self {
        self.calculation_steps.push(step);
        self
    }

    /// Parses a plan from strict JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A step after execution: inputs resolved, result and trace attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutedStep {
    pub step_name: String,
    pub target_variable: String,
    pub formula_name: String,
    pub inputs: PlanInputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_formula: Option<String>,
    pub result: f64,
    /// Formula with values plugged in, for display only.
    pub substituted_formula: String,
}

impl ExecutedStep {
    pub fn from_step(
        step: &CalculationStep,
        inputs: PlanInputs,
        result: f64,
        substituted_formula: String,
    ) -> Self {
        Self {
            step_name: step.step_name.clone(),
            target_variable: step.target_variable.clone(),
            formula_name: step.formula_name.clone(),
            inputs,
            generated_formula: step.generated_formula.clone(),
            result,
            substituted_formula,
        }
    }
}
