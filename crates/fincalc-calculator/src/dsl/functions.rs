//! Built-in functions for the expression evaluator
//!
//! Function names are matched case-insensitively.

use anyhow::{Result, anyhow, bail};
use std::collections::HashMap;

/// Trait for functions that can be called from expressions
pub trait CalculatorFunction: Send + Sync {
    /// Call the function with the given arguments
    fn call(&self, args: &[f64]) -> Result<f64>;

    /// Get the expected number of arguments (None when it varies)
    fn arity(&self) -> Option<usize>;

    /// Get a description of this function
    fn description(&self) -> &'static str;
}

/// Registry for expression functions
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn CalculatorFunction>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry").field("functions", &names).finish()
    }
}

impl FunctionRegistry {
    /// Create a new empty function registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a function registry with the built-in math functions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        // Logarithms and exponentials
        registry.register("log", Box::new(LogFunction));
        registry.register("ln", Box::new(UnaryMath::new("Natural logarithm", f64::ln)));
        registry.register("log10", Box::new(UnaryMath::new("Base-10 logarithm", f64::log10)));
        registry.register("log2", Box::new(UnaryMath::new("Base-2 logarithm", f64::log2)));
        registry.register("exp", Box::new(UnaryMath::new("e raised to the argument", f64::exp)));
        registry.register("sqrt", Box::new(UnaryMath::new("Square root", f64::sqrt)));
        registry.register("pow", Box::new(PowFunction));

        // Basic math
        registry.register("abs", Box::new(UnaryMath::new("Absolute value", f64::abs)));
        registry.register("floor", Box::new(UnaryMath::new("Largest integer not above", f64::floor)));
        registry.register("ceil", Box::new(UnaryMath::new("Smallest integer not below", f64::ceil)));
        registry.register("round", Box::new(RoundFunction));
        registry.register("max", Box::new(MaxFunction));
        registry.register("min", Box::new(MinFunction));

        registry
    }

    /// Register a new function
    pub fn register(&mut self, name: &str, function: Box<dyn CalculatorFunction>) {
        self.functions.insert(name.to_lowercase(), function);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Sorted names and descriptions of every registered function
    pub fn describe(&self) -> Vec<(&str, &'static str)> {
        let mut entries: Vec<_> =
            self.functions.iter().map(|(name, f)| (name.as_str(), f.description())).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Call a function, checking fixed arity first
    pub fn call(&self, name: &str, args: &[f64]) -> Result<f64> {
        let function = self
            .functions
            .get(&name.to_lowercase())
            .ok_or_else(|| anyhow!("Unknown function: {}", name))?;

        if let Some(expected) = function.arity() {
            if args.len() != expected {
                bail!("{}() expects {} argument(s), got {}", name, expected, args.len());
            }
        }

        function.call(args)
    }
}

/// Any single-argument `f64 -> f64` function
struct UnaryMath {
    description: &'static str,
    op: fn(f64) -> f64,
}

impl UnaryMath {
    fn new(description: &'static str, op: fn(f64) -> f64) -> Self {
        Self { description, op }
    }
}

impl CalculatorFunction for UnaryMath {
    fn call(&self, args: &[f64]) -> Result<f64> {
        match args {
            [x] => Ok((self.op)(*x)),
            _ => Err(anyhow!("expected exactly one argument")),
        }
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    fn description(&self) -> &'static str {
        self.description
    }
}

struct LogFunction;

impl CalculatorFunction for LogFunction {
    fn call(&self, args: &[f64]) -> Result<f64> {
        match args {
            [x] => Ok(x.ln()),
            [x, base] => Ok(x.ln() / base.ln()),
            _ => Err(anyhow!("log() expects a value and an optional base")),
        }
    }

    fn arity(&self) -> Option<usize> {
        None // 1 or 2 arguments
    }

    fn description(&self) -> &'static str {
        "Natural logarithm, or logarithm in the given base"
    }
}

struct PowFunction;

impl CalculatorFunction for PowFunction {
    fn call(&self, args: &[f64]) -> Result<f64> {
        match args {
            [base, exponent] => Ok(base.powf(*exponent)),
            _ => Err(anyhow!("pow() expects a base and an exponent")),
        }
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    fn description(&self) -> &'static str {
        "Raises the first argument to the power of the second"
    }
}

struct RoundFunction;

impl CalculatorFunction for RoundFunction {
    fn call(&self, args: &[f64]) -> Result<f64> {
        match args {
            [n] => Ok(n.round()),
            [n, precision] => {
                let factor = 10.0_f64.powi(precision.round() as i32);
                Ok((n * factor).round() / factor)
            }
            _ => Err(anyhow!("round() expects a number and optional precision")),
        }
    }

    fn arity(&self) -> Option<usize> {
        None // 1 or 2 arguments
    }

    fn description(&self) -> &'static str {
        "Rounds a number to the nearest integer or specified precision"
    }
}

struct MaxFunction;

impl CalculatorFunction for MaxFunction {
    fn call(&self, args: &[f64]) -> Result<f64> {
        args.iter()
            .copied()
            .reduce(f64::max)
            .ok_or_else(|| anyhow!("max() requires at least one argument"))
    }

    fn arity(&self) -> Option<usize> {
        None // variadic
    }

    fn description(&self) -> &'static str {
        "Returns the maximum value from the arguments"
    }
}

struct MinFunction;

impl CalculatorFunction for MinFunction {
    fn call(&self, args: &[f64]) -> Result<f64> {
        args.iter()
            .copied()
            .reduce(f64::min)
            .ok_or_else(|| anyhow!("min() requires at least one argument"))
    }

    fn arity(&self) -> Option<usize> {
        None // variadic
    }

    fn description(&self) -> &'static str {
        "Returns the minimum value from the arguments"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_natural_and_with_base() {
        let registry = FunctionRegistry::with_builtins();
        assert!((registry.call("log", &[std::f64::consts::E]).unwrap() - 1.0).abs() < 1e-12);
        assert!((registry.call("log", &[1000.0, 10.0]).unwrap() - 3.0).abs() < 1e-12);
        assert!(registry.call("log", &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(registry.call("SQRT", &[16.0]).unwrap(), 4.0);
        assert!(registry.contains("Log10"));
    }

    #[test]
    fn test_fixed_arity_is_checked() {
        let registry = FunctionRegistry::with_builtins();
        let err = registry.call("pow", &[2.0]).unwrap_err();
        assert!(err.to_string().contains("expects 2 argument(s), got 1"));
    }

    #[test]
    fn test_min_max_round() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(registry.call("max", &[1.0, 7.5, 3.0]).unwrap(), 7.5);
        assert_eq!(registry.call("min", &[1.0, 7.5, -3.0]).unwrap(), -3.0);
        assert!(registry.call("max", &[]).is_err());
        assert_eq!(registry.call("round", &[1.23456, 2.0]).unwrap(), 1.23);
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::with_builtins();
        let err = registry.call("system", &[1.0]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown function: system");
    }
}
