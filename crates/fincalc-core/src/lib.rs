//! FinCalc core: deterministic execution of financial calculation plans.
//!
//! A [`CalculationPlan`] names an ordered list of steps, each applying a
//! catalog formula (or a sandboxed arithmetic expression) to literal inputs
//! and `{{name}}` back-references to earlier results. [`PlanExecutor`] runs
//! those steps in order and returns every [`ExecutedStep`] with its
//! substituted-formula trace, or the first error.
//!
//! ```
//! use fincalc_core::{CalculationPlan, CalculationStep, PlanExecutor, PlanValue};
//!
//! let plan = CalculationPlan::new("S")
//!     .with_initial("P", 1000.0)
//!     .with_step(
//!         CalculationStep::new("Monto", "S", "formula_is_S_from_Pjn")
//!             .with_input("P", PlanValue::reference_to("P"))
//!             .with_input("j", 0.1)
//!             .with_input("n", 2.0),
//!     );
//!
//! let steps = PlanExecutor::new().execute(&plan).unwrap();
//! assert!((steps[0].result - 1200.0).abs() < 1e-9);
//! ```

pub mod batch;
pub mod engine;
pub mod environment;
pub mod error;
pub mod manual;
pub mod response;

pub use batch::ProviderOutcome;
pub use engine::{ExecutionReport, PlanExecutor, final_step};
pub use environment::VariableEnvironment;
pub use error::{ErrorSeverity, FincalcError, FincalcResult};
pub use manual::{manual_plan, parse_assignments};
pub use response::{parse_plan_response, parse_plan_strict};

pub use fincalc_calculator::built_in::rates::convert_periodic_rate;
pub use fincalc_calculator::{ExpressionLimits, FormulaCatalog, FormulaCategory, FormulaSpec};
pub use fincalc_types::{
    CalculationPlan, CalculationStep, EXPERIMENTAL_FORMULA, ExecutedStep, PlanInputs, PlanValue,
};
