//! Tree-walking evaluator over a numeric scope

use crate::dsl::ast::{Expression, UnaryOperator};
use crate::dsl::functions::FunctionRegistry;
use anyhow::{Result, anyhow};
use std::collections::HashMap;

/// Named constants; scope variables with the same name win.
const CONSTANTS: &[(&str, f64)] = &[("e", std::f64::consts::E), ("pi", std::f64::consts::PI)];

/// Evaluate an expression against `scope`
///
/// Arithmetic follows IEEE rules, so division by zero yields an infinity
/// rather than an error. Callers decide whether non-finite values are valid.
pub fn evaluate_expression(
    expr: &Expression,
    scope: &HashMap<String, f64>,
    functions: &FunctionRegistry,
) -> Result<f64> {
    match expr {
        Expression::Literal(value) => Ok(*value),

        Expression::Variable(name) => lookup(name, scope),

        Expression::BinaryOp { left, operator, right } => {
            let left_val = evaluate_expression(left, scope, functions)?;
            let right_val = evaluate_expression(right, scope, functions)?;
            Ok(operator.apply(left_val, right_val))
        }

        Expression::UnaryOp { operator, operand } => {
            let value = evaluate_expression(operand, scope, functions)?;
            Ok(match operator {
                UnaryOperator::Negate => -value,
                UnaryOperator::Plus => value,
            })
        }

        Expression::FunctionCall { name, args } => {
            let arg_values = args
                .iter()
                .map(|arg| evaluate_expression(arg, scope, functions))
                .collect::<Result<Vec<_>>>()?;
            functions.call(name, &arg_values)
        }
    }
}

fn lookup(name: &str, scope: &HashMap<String, f64>) -> Result<f64> {
    if let Some(value) = scope.get(name) {
        return Ok(*value);
    }

    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| anyhow!("Variable '{}' not found in scope", name))
}
