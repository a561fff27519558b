//! String-based helpers for checking learner answers.

mod classify;

use crate::comparable::{to_comparable_operation, ComparableOperation};
use crate::error::Result;
use crate::eval::evaluate_numeric;
use crate::expr::{Equation, Expr};
use crate::parser::{
    parse_algebraic_equation, parse_algebraic_expression, parse_numeric_expression,
    ErrorCheckingMode,
};
use crate::polynomial::{reduce_to_polynomial, Polynomial};
use crate::real::Real;

pub use classify::{
    equation_is_equivalent_to, is_equivalent_to, matches_exactly,
    matches_up_to_trivial_manipulations, Answer,
};

/// Parses a numeric expression with every check enabled.
pub fn parse(input: &str) -> Result<Expr> {
    Ok(parse_numeric_expression(input, ErrorCheckingMode::AllErrors)?)
}

pub fn parse_with_variables(input: &str, variables: &[&str]) -> Result<Expr> {
    Ok(parse_algebraic_expression(
        input,
        variables,
        ErrorCheckingMode::AllErrors,
    )?)
}

pub fn parse_equation(input: &str, variables: &[&str]) -> Result<Equation> {
    Ok(parse_algebraic_equation(
        input,
        variables,
        ErrorCheckingMode::AllErrors,
    )?)
}

/// Parses leniently (required rules only) and evaluates.
pub fn evaluate(input: &str) -> Result<Real> {
    let expr = parse_numeric_expression(input, ErrorCheckingMode::RequiredOnly)?;
    Ok(evaluate_numeric(&expr)?)
}

pub fn eval(input: &str) -> Result<String> {
    Ok(evaluate(input)?.to_string())
}

/// Canonical polynomial of `input`, or `None` if it is not polynomial.
pub fn reduce(input: &str, variables: &[&str]) -> Result<Option<Polynomial>> {
    let expr = parse_algebraic_expression(input, variables, ErrorCheckingMode::RequiredOnly)?;
    Ok(reduce_to_polynomial(&expr))
}

pub fn poly(input: &str, variables: &[&str]) -> Result<Option<String>> {
    Ok(reduce(input, variables)?.map(|poly| poly.to_string()))
}

pub fn comparable(input: &str, variables: &[&str]) -> Result<ComparableOperation> {
    let expr = parse_algebraic_expression(input, variables, ErrorCheckingMode::RequiredOnly)?;
    Ok(to_comparable_operation(&expr))
}

pub fn pretty(expr: &Expr) -> String {
    crate::format::pretty(expr)
}
