//! Reduction of an expression tree to a single [`Real`].

use std::collections::HashMap;

use crate::error::EvalError;
use crate::expr::{Expr, Function};
use crate::real::Real;

/// Values bound to variable names.
pub type Environment = HashMap<String, Real>;

/// Evaluates `expr`, looking variables up in `env`.
///
/// Exact division by zero and roots that are undefined over the reals are reported as errors
/// instead of panicking. Float operations keep IEEE semantics, so `1/0.0` is infinite.
pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Real, EvalError> {
    match expr {
        Expr::Constant(value) => Ok(*value),
        Expr::Variable(name) => env
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
        Expr::Add(a, b) => Ok(evaluate(a, env)? + evaluate(b, env)?),
        Expr::Sub(a, b) => Ok(evaluate(a, env)? - evaluate(b, env)?),
        Expr::Mul(a, b) => Ok(evaluate(a, env)? * evaluate(b, env)?),
        Expr::Div(a, b) => {
            let dividend = evaluate(a, env)?;
            let divisor = evaluate(b, env)?;
            dividend
                .checked_div(&divisor)
                .ok_or(EvalError::DivisionByZero)
        }
        Expr::Pow(a, b) => {
            let base = evaluate(a, env)?;
            let exponent = evaluate(b, env)?;
            base.pow(&exponent).ok_or(EvalError::Undefined)
        }
        Expr::Neg(a) => Ok(-evaluate(a, env)?),
        Expr::Pos(a) | Expr::Group(a) => evaluate(a, env),
        Expr::Call(Function::SquareRoot, a) => {
            evaluate(a, env)?.sqrt().ok_or(EvalError::Undefined)
        }
    }
}

/// Evaluates a tree that contains no variables.
pub fn evaluate_numeric(expr: &Expr) -> Result<Real, EvalError> {
    evaluate(expr, &Environment::new())
}
