//! Plan execution
//!
//! `PlanExecutor` walks a plan's steps strictly in order. Each step resolves its
//! inputs against the variables bound so far, computes through the formula
//! catalog, checks the result is finite, then binds its target variable. The
//! first failure aborts the whole plan; no partial results are returned.

use crate::environment::VariableEnvironment;
use crate::error::{FincalcError, FincalcResult};
use fincalc_calculator::{ExpressionLimits, FormulaCatalog};
use fincalc_types::{CalculationPlan, CalculationStep, ExecutedStep};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Executes calculation plans against a formula catalog.
///
/// Holds no per-plan state, so one executor can serve many threads.
#[derive(Debug, Default)]
pub struct PlanExecutor {
    catalog: FormulaCatalog,
}

impl PlanExecutor {
    /// Executor over the full built-in catalog with default expression limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ExpressionLimits) -> Self {
        Self::with_catalog(FormulaCatalog::with_limits(limits))
    }

    pub fn with_catalog(catalog: FormulaCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FormulaCatalog {
        &self.catalog
    }

    /// Executes every step of `plan` and returns them in order.
    #[instrument(
        skip(self, plan),
        fields(steps = plan.calculation_steps.len(), target = %plan.final_target_variable)
    )]
    pub fn execute(&self, plan: &CalculationPlan) -> FincalcResult<Vec<ExecutedStep>> {
        info!("Executing calculation plan");

        let mut environment = VariableEnvironment::new(&plan.initial_data);
        let mut executed = Vec::with_capacity(plan.calculation_steps.len());

        for step in &plan.calculation_steps {
            let executed_step = self.execute_step(step, &environment).inspect_err(|e| {
                warn!(
                    category = e.category(),
                    severity = %e.severity(),
                    step = %step.step_name,
                    "Plan execution failed: {e}"
                );
            })?;

            if let Some(previous) = environment.bind(&step.target_variable, executed_step.result) {
                warn!(
                    variable = %step.target_variable,
                    previous = %previous,
                    step = %step.step_name,
                    "Step result shadows an earlier binding"
                );
            }
            executed.push(executed_step);
        }

        info!(executed_steps = executed.len(), "Calculation plan completed");
        Ok(executed)
    }

    /// Executes `plan` and packages the steps with the final result.
    pub fn run(&self, plan: &CalculationPlan) -> FincalcResult<ExecutionReport> {
        let steps = self.execute(plan)?;
        Ok(ExecutionReport::new(plan, steps))
    }

    /// Resolves, computes and validates a single step without binding its result.
    pub fn execute_step(
        &self,
        step: &CalculationStep,
        environment: &VariableEnvironment,
    ) -> FincalcResult<ExecutedStep> {
        let inputs = environment.resolve(&step.inputs, &step.step_name)?;

        let outcome = self
            .catalog
            .compute(&step.formula_name, &inputs, step.generated_formula.as_deref())
            .map_err(|e| {
                debug!(step = %step.step_name, code = e.code(), "Formula dispatch failed");
                FincalcError::in_step(e, &step.step_name)
            })?;

        if !outcome.result.is_finite() {
            return Err(FincalcError::InvalidResult {
                formula: step.formula_name.clone(),
                step: step.step_name.clone(),
                value: outcome.result,
            });
        }

        debug!(
            step = %step.step_name,
            formula = %step.formula_name,
            target = %step.target_variable,
            result = outcome.result,
            "Executed step"
        );

        Ok(ExecutedStep::from_step(step, inputs, outcome.result, outcome.substituted_formula))
    }
}

/// Executed steps of one plan plus its final answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub interpretation: String,
    pub final_target_variable: String,
    /// Result of the last step bound to `final_target_variable`, if any step was.
    pub final_result: Option<f64>,
    pub steps: Vec<ExecutedStep>,
}

impl ExecutionReport {
    pub fn new(plan: &CalculationPlan, steps: Vec<ExecutedStep>) -> Self {
        let final_result = final_step(&steps, &plan.final_target_variable).map(|step| step.result);
        Self {
            interpretation: plan.interpretation.clone(),
            final_target_variable: plan.final_target_variable.clone(),
            final_result,
            steps,
        }
    }

    pub fn final_step(&self) -> Option<&ExecutedStep> {
        final_step(&self.steps, &self.final_target_variable)
    }
}

/// The step whose target is `target`; the latest one wins when a target is reused.
pub fn final_step<'a>(steps: &'a [ExecutedStep], target: &str) -> Option<&'a ExecutedStep> {
    steps.iter().rev().find(|step| step.target_variable == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincalc_types::PlanValue;

    fn simple_interest_plan() -> CalculationPlan {
        CalculationPlan::new("S")
            .with_interpretation("Monto a interés simple")
            .with_initial("P", 1000.0)
            .with_initial("j", 0.1)
            .with_initial("n", 2.0)
            .with_step(
                CalculationStep::new("Calcular monto", "S", "formula_is_S_from_Pjn")
                    .with_input("P", PlanValue::reference_to("P"))
                    .with_input("j", PlanValue::reference_to("j"))
                    .with_input("n", PlanValue::reference_to("n")),
            )
    }

    #[test]
    fn test_execute_resolves_back_references() {
        let steps = PlanExecutor::new().execute(&simple_interest_plan()).unwrap();
        assert_eq!(steps.len(), 1);
        assert!((steps[0].result - 1200.0).abs() < 1e-9);
        assert_eq!(steps[0].inputs["P"], PlanValue::Number(1000.0));
        assert_eq!(steps[0].substituted_formula, "1000 * (1 + 0.1 * 2) = 1200");
    }

    #[test]
    fn test_run_reports_final_result() {
        let report = PlanExecutor::new().run(&simple_interest_plan()).unwrap();
        assert_eq!(report.final_result, Some(report.steps[0].result));
        assert_eq!(report.interpretation, "Monto a interés simple");
        assert_eq!(report.final_step().map(|s| s.step_name.as_str()), Some("Calcular monto"));
    }

    #[test]
    fn test_missing_final_target_is_not_an_error() {
        let mut plan = simple_interest_plan();
        plan.final_target_variable = "VF".into();
        let report = PlanExecutor::new().run(&plan).unwrap();
        assert_eq!(report.final_result, None);
    }

    #[test]
    fn test_non_finite_result_names_formula() {
        let plan = CalculationPlan::new("n").with_step(
            CalculationStep::new("Tiempo", "n", "formula_is_n_from_IPj")
                .with_input("I", 100.0)
                .with_input("P", 1000.0)
                .with_input("j", 0.0),
        );
        let err = PlanExecutor::new().execute(&plan).unwrap_err();
        assert!(matches!(
            err,
            FincalcError::InvalidResult { ref formula, ref step, value }
                if formula == "formula_is_n_from_IPj" && step == "Tiempo" && value.is_infinite()
        ));
    }

    #[test]
    fn test_empty_plan_executes_to_nothing() {
        let steps = PlanExecutor::new().execute(&CalculationPlan::new("S")).unwrap();
        assert!(steps.is_empty());
    }
}
