//! Abstract syntax tree for arithmetic expressions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// AST node representing an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Numeric literal
    Literal(f64),

    /// Variable reference, or one of the constants `e` / `pi`
    Variable(String),

    /// Binary operation (a + b, a ^ b, etc.)
    BinaryOp { left: Box<Expression>, operator: BinaryOperator, right: Box<Expression> },

    /// Unary operation (-a, +a)
    UnaryOp { operator: UnaryOperator, operand: Box<Expression> },

    /// Function call (log(x), max(a, b))
    FunctionCall { name: String, args: Vec<Expression> },
}

/// Binary operators supported by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// Unary operators supported by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Numeric negation (-x)
    Negate,
    /// No-op sign (+x)
    Plus,
}

impl Expression {
    /// Create a numeric literal
    pub fn number(value: f64) -> Self {
        Self::Literal(value)
    }

    /// Create a variable reference
    pub fn var(name: &str) -> Self {
        Self::Variable(name.to_string())
    }

    /// Create a binary operation
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Self::BinaryOp { left: Box::new(left), operator: op, right: Box::new(right) }
    }

    /// Create a unary operation
    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Self::UnaryOp { operator: op, operand: Box::new(operand) }
    }

    /// Create a function call
    pub fn call(name: &str, args: Vec<Expression>) -> Self {
        Self::FunctionCall { name: name.to_string(), args }
    }
}

impl BinaryOperator {
    /// Applies the operator with IEEE semantics; division by zero is infinite.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
            BinaryOperator::Power => left.powf(right),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
        };
        f.write_str(symbol)
    }
}

/// Extract all variable names referenced in an expression, sorted
pub fn extract_variables(expr: &Expression) -> Vec<String> {
    let mut variables = BTreeSet::new();
    extract_variables_recursive(expr, &mut variables);
    variables.into_iter().collect()
}

fn extract_variables_recursive(expr: &Expression, variables: &mut BTreeSet<String>) {
    match expr {
        Expression::Variable(name) => {
            variables.insert(name.clone());
        }
        Expression::BinaryOp { left, right, .. } => {
            extract_variables_recursive(left, variables);
            extract_variables_recursive(right, variables);
        }
        Expression::UnaryOp { operand, .. } => {
            extract_variables_recursive(operand, variables);
        }
        Expression::FunctionCall { args, .. } => {
            for arg in args {
                extract_variables_recursive(arg, variables);
            }
        }
        Expression::Literal(_) => {}
    }
}
