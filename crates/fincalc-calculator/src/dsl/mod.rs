//! Sandboxed arithmetic DSL for experimental plan steps
//!
//! Expressions are numeric only: literals, named variables, `+ - * /`,
//! exponentiation (`^` or `**`), parentheses, unary signs and a fixed set of
//! math functions. Nothing in an expression can reach the host.

pub mod ast;
pub mod evaluator;
pub mod functions;
pub mod parser;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Size bounds applied before an expression is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionLimits {
    /// Maximum length in characters
    pub max_expression_length: usize,
    /// Maximum nesting of parentheses, calls and signs
    pub max_expression_depth: usize,
}

impl Default for ExpressionLimits {
    fn default() -> Self {
        Self { max_expression_length: 10_000, max_expression_depth: 50 }
    }
}

/// Parsed expression plus the variables it reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledExpression {
    /// Original expression string
    pub source: String,
    /// Compiled abstract syntax tree
    pub ast: ast::Expression,
    /// Variables referenced in the expression, sorted
    pub variables: Vec<String>,
}

/// Parses and evaluates expressions; holds no per-call state.
#[derive(Debug)]
pub struct ExpressionEvaluator {
    functions: functions::FunctionRegistry,
    limits: ExpressionLimits,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self::with_limits(ExpressionLimits::default())
    }

    pub fn with_limits(limits: ExpressionLimits) -> Self {
        Self { functions: functions::FunctionRegistry::with_builtins(), limits }
    }

    /// Parse and compile an expression
    pub fn compile(&self, expression: &str) -> Result<CompiledExpression> {
        let ast = parser::parse_expression(expression, &self.limits)?;
        let variables = ast::extract_variables(&ast);
        Ok(CompiledExpression { source: expression.to_string(), ast, variables })
    }

    /// Evaluate a compiled expression against `scope`
    pub fn evaluate(&self, expression: &CompiledExpression, scope: &HashMap<String, f64>) -> Result<f64> {
        evaluator::evaluate_expression(&expression.ast, scope, &self.functions)
    }

    /// Convenience method to compile and evaluate in one step
    pub fn eval(&self, expression: &str, scope: &HashMap<String, f64>) -> Result<f64> {
        let compiled = self.compile(expression)?;
        self.evaluate(&compiled, scope)
    }
}
