//! Formula catalog: a lookup table from formula identifier to a pure function.

use crate::dsl::{ExpressionEvaluator, ExpressionLimits};
use crate::substitution::render_trace;
use crate::{CalculationResult, CalculatorError, CalculatorInputs, built_in};
use fincalc_types::{EXPERIMENTAL_FORMULA, PlanInputs, PlanValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Group a catalog entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormulaCategory {
    Utility,
    SimpleInterest,
    CompoundInterest,
    Rates,
    RationalDiscount,
    SimpleBankDiscount,
    CompoundBankDiscount,
    OrdinaryAnnuity,
    DueAnnuity,
    DeferredAnnuity,
    ArithmeticGradient,
    GeometricGradient,
    Loan,
}

impl FormulaCategory {
    pub const ALL: [FormulaCategory; 13] = [
        FormulaCategory::Utility,
        FormulaCategory::SimpleInterest,
        FormulaCategory::CompoundInterest,
        FormulaCategory::Rates,
        FormulaCategory::RationalDiscount,
        FormulaCategory::SimpleBankDiscount,
        FormulaCategory::CompoundBankDiscount,
        FormulaCategory::OrdinaryAnnuity,
        FormulaCategory::DueAnnuity,
        FormulaCategory::DeferredAnnuity,
        FormulaCategory::ArithmeticGradient,
        FormulaCategory::GeometricGradient,
        FormulaCategory::Loan,
    ];

    /// Kebab-case identifier, as accepted by `FromStr`.
    pub fn slug(&self) -> &'static str {
        match self {
            FormulaCategory::Utility => "utility",
            FormulaCategory::SimpleInterest => "simple-interest",
            FormulaCategory::CompoundInterest => "compound-interest",
            FormulaCategory::Rates => "rates",
            FormulaCategory::RationalDiscount => "rational-discount",
            FormulaCategory::SimpleBankDiscount => "simple-bank-discount",
            FormulaCategory::CompoundBankDiscount => "compound-bank-discount",
            FormulaCategory::OrdinaryAnnuity => "ordinary-annuity",
            FormulaCategory::DueAnnuity => "due-annuity",
            FormulaCategory::DeferredAnnuity => "deferred-annuity",
            FormulaCategory::ArithmeticGradient => "arithmetic-gradient",
            FormulaCategory::GeometricGradient => "geometric-gradient",
            FormulaCategory::Loan => "loan",
        }
    }

    /// Heading used in the knowledge base text.
    pub fn title(&self) -> &'static str {
        match self {
            FormulaCategory::Utility => "UTILIDADES",
            FormulaCategory::SimpleInterest => "INTERÉS SIMPLE",
            FormulaCategory::CompoundInterest => "INTERÉS COMPUESTO",
            FormulaCategory::Rates => "TASAS DE INTERÉS",
            FormulaCategory::RationalDiscount => "DESCUENTO RACIONAL",
            FormulaCategory::SimpleBankDiscount => "DESCUENTO BANCARIO/COMERCIAL SIMPLE",
            FormulaCategory::CompoundBankDiscount => "DESCUENTO BANCARIO/COMERCIAL COMPUESTO",
            FormulaCategory::OrdinaryAnnuity => "ANUALIDADES VENCIDAS",
            FormulaCategory::DueAnnuity => "ANUALIDADES ANTICIPADAS",
            FormulaCategory::DeferredAnnuity => "ANUALIDADES DIFERIDAS",
            FormulaCategory::ArithmeticGradient => "GRADIENTE ARITMÉTICO",
            FormulaCategory::GeometricGradient => "GRADIENTE GEOMÉTRICO",
            FormulaCategory::Loan => "PRÉSTAMOS (para cuota N)",
        }
    }
}

impl fmt::Display for FormulaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormulaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        FormulaCategory::ALL
            .into_iter()
            .find(|category| category.slug() == wanted)
            .ok_or_else(|| format!("unknown formula category '{s}'"))
    }
}

/// What a formula function hands back to the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    /// Replaces the entry's template in the trace, for branch-specific forms.
    pub template: Option<&'static str>,
    pub note: Option<&'static str>,
}

impl Evaluation {
    pub fn new(value: f64) -> Self {
        Self { value, template: None, note: None }
    }

    /// A result computed by an alternative branch with its own symbolic form.
    pub fn special_case(value: f64, template: &'static str, note: &'static str) -> Self {
        Self { value, template: Some(template), note: Some(note) }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct FormulaSpec {
    pub name: &'static str,
    pub category: FormulaCategory,
    /// Conventional name of the computed variable.
    pub output: &'static str,
    /// Label shown by the manual calculator.
    pub label: &'static str,
    pub inputs: &'static [&'static str],
    /// Optional inputs and the value used when the plan leaves them out.
    pub optional: &'static [(&'static str, f64)],
    /// Symbolic right-hand side; identifiers are input names.
    pub template: &'static str,
    pub eval: fn(&CalculatorInputs) -> CalculationResult<Evaluation>,
}

impl FormulaSpec {
    /// Validates required inputs are present, then evaluates.
    pub fn compute(&self, inputs: &PlanInputs) -> CalculationResult<FormulaOutcome> {
        if let Some(missing) = self.inputs.iter().find(|name| !inputs.contains_key(**name)) {
            return Err(CalculatorError::MissingInput {
                formula: self.name.to_string(),
                input: (*missing).to_string(),
            });
        }

        let calculator_inputs = CalculatorInputs::new(self.name, inputs, self.optional);
        let evaluation = (self.eval)(&calculator_inputs)?;
        let template = evaluation.template.unwrap_or(self.template);
        let substituted_formula = render_trace(
            template,
            &calculator_inputs.with_defaults(),
            evaluation.value,
            evaluation.note,
        );

        Ok(FormulaOutcome { result: evaluation.value, substituted_formula })
    }

    /// `name: OUTPUT = template` line of the knowledge base.
    pub fn describe(&self) -> String {
        format!("{}: {} = {}", self.name, self.output, self.template)
    }
}

/// Result of one catalog or experimental computation.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaOutcome {
    pub result: f64,
    pub substituted_formula: String,
}

/// The fixed table of formulas plus the evaluator backing experimental steps.
///
/// Immutable after construction and safe to share between threads.
#[derive(Debug)]
pub struct FormulaCatalog {
    formulas: HashMap<&'static str, &'static FormulaSpec>,
    evaluator: ExpressionEvaluator,
}

impl Default for FormulaCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaCatalog {
    pub fn new() -> Self {
        Self::with_limits(ExpressionLimits::default())
    }

    /// Catalog whose experimental evaluator enforces `limits`.
    pub fn with_limits(limits: ExpressionLimits) -> Self {
        let mut catalog =
            Self { formulas: HashMap::new(), evaluator: ExpressionEvaluator::with_limits(limits) };
        for spec in built_in::all() {
            catalog.register(spec);
        }
        catalog
    }

    pub fn register(&mut self, spec: &'static FormulaSpec) {
        self.formulas.insert(spec.name, spec);
    }

    pub fn get(&self, name: &str) -> Option<&'static FormulaSpec> {
        self.formulas.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        name == EXPERIMENTAL_FORMULA || self.formulas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn evaluator(&self) -> &ExpressionEvaluator {
        &self.evaluator
    }

    /// All entries sorted by category, then name.
    pub fn list(&self) -> Vec<&'static FormulaSpec> {
        let mut specs: Vec<_> = self.formulas.values().copied().collect();
        specs.sort_by(|a, b| a.category.cmp(&b.category).then(a.name.cmp(b.name)));
        specs
    }

    pub fn by_category(&self, category: FormulaCategory) -> Vec<&'static FormulaSpec> {
        self.list().into_iter().filter(|spec| spec.category == category).collect()
    }

    /// Catalog rendered as the grouped text block given to the plan generator.
    pub fn knowledge_base(&self) -> String {
        let mut grouped: BTreeMap<FormulaCategory, Vec<&FormulaSpec>> = BTreeMap::new();
        for spec in self.list() {
            grouped.entry(spec.category).or_default().push(spec);
        }

        let mut text = String::new();
        for (category, specs) in grouped {
            text.push_str(&format!("--- {} ---\n", category.title()));
            for spec in specs {
                text.push_str(&spec.describe());
                text.push('\n');
            }
            text.push('\n');
        }
        text.push_str(&format!(
            "{EXPERIMENTAL_FORMULA}: <target> = generated_formula (expresión aritmética sobre las entradas)\n"
        ));
        text
    }

    /// Computes `formula_name` over resolved inputs.
    ///
    /// `generated_formula` is only read for the experimental sentinel.
    pub fn compute(
        &self,
        formula_name: &str,
        inputs: &PlanInputs,
        generated_formula: Option<&str>,
    ) -> CalculationResult<FormulaOutcome> {
        if formula_name == EXPERIMENTAL_FORMULA {
            let expression = generated_formula.ok_or(CalculatorError::MissingExpression)?;
            return self.compute_experimental(expression, inputs);
        }

        let spec = self
            .get(formula_name)
            .ok_or_else(|| CalculatorError::UnknownFormula { formula: formula_name.to_string() })?;
        trace!(formula = spec.name, category = %spec.category, "Dispatching catalog formula");
        spec.compute(inputs)
    }

    fn compute_experimental(
        &self,
        expression: &str,
        inputs: &PlanInputs,
    ) -> CalculationResult<FormulaOutcome> {
        let scope: HashMap<String, f64> = inputs
            .iter()
            .filter_map(|(name, value)| {
                let number = match value {
                    PlanValue::Number(n) => Some(*n),
                    PlanValue::Text(s) => s.trim().parse::<f64>().ok(),
                };
                number.map(|n| (name.clone(), n))
            })
            .collect();

        let result = self.evaluator.eval(expression, &scope).map_err(|err| {
            CalculatorError::Expression { expression: expression.to_string(), message: format!("{err:#}") }
        })?;

        Ok(FormulaOutcome { result, substituted_formula: render_trace(expression, inputs, result, None) })
    }
}
