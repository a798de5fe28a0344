//! Executing plans from several providers side by side.

use crate::engine::{ExecutionReport, PlanExecutor};
use crate::error::FincalcError;
use fincalc_types::CalculationPlan;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

/// Result of one provider's plan. Exactly one of `report` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderOutcome {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ExecutionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub failure: Option<FincalcError>,
}

impl ProviderOutcome {
    fn new(provider: &str, result: Result<ExecutionReport, FincalcError>) -> Self {
        match result {
            Ok(report) => Self { provider: provider.to_string(), report: Some(report), error: None, failure: None },
            Err(e) => Self {
                provider: provider.to_string(),
                report: None,
                error: Some(e.to_string()),
                failure: Some(e),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.report.is_some()
    }

    pub fn final_result(&self) -> Option<f64> {
        self.report.as_ref().and_then(|report| report.final_result)
    }
}

impl PlanExecutor {
    /// Runs each provider's plan in parallel; outcomes keep the input order.
    ///
    /// A failing plan only affects its own outcome.
    #[instrument(skip(self, plans), fields(plans = plans.len()))]
    pub fn execute_all(&self, plans: &[(String, CalculationPlan)]) -> Vec<ProviderOutcome> {
        let outcomes: Vec<ProviderOutcome> = plans
            .par_iter()
            .map(|(provider, plan)| ProviderOutcome::new(provider, self.run(plan)))
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(succeeded, failed = outcomes.len() - succeeded, "Provider plans executed");
        outcomes
    }
}
