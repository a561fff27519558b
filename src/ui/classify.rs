use log::trace;

use crate::comparable::to_comparable_operation;
use crate::error::Result;
use crate::eval::evaluate_numeric;
use crate::expr::{Equation, Expr};
use crate::parser::{
    parse_algebraic_equation, parse_algebraic_expression, parse_numeric_expression,
    ErrorCheckingMode,
};
use crate::polynomial::{reduce_to_polynomial, Polynomial};

/// How an answer is read: numbers only, or with the given variables.
#[derive(Clone, Copy, Debug)]
pub enum Answer<'v> {
    Numeric,
    Algebraic(&'v [&'v str]),
}

impl Answer<'_> {
    fn parse(&self, input: &str) -> Result<Expr> {
        let mode = ErrorCheckingMode::RequiredOnly;
        Ok(match self {
            Answer::Numeric => parse_numeric_expression(input, mode)?,
            Answer::Algebraic(variables) => parse_algebraic_expression(input, variables, mode)?,
        })
    }
}

/// Identical trees, parentheses included.
pub fn matches_exactly(answer: &str, expected: &str, kind: Answer<'_>) -> Result<bool> {
    Ok(kind.parse(answer)? == kind.parse(expected)?)
}

/// Equal up to reordering of sums and products.
pub fn matches_up_to_trivial_manipulations(
    answer: &str,
    expected: &str,
    kind: Answer<'_>,
) -> Result<bool> {
    let answer = to_comparable_operation(&kind.parse(answer)?);
    let expected = to_comparable_operation(&kind.parse(expected)?);
    Ok(answer == expected)
}

/// Numeric answers compare by value. Algebraic answers compare by canonical polynomial, falling
/// back to the commutative form when either side is not polynomial.
pub fn is_equivalent_to(answer: &str, expected: &str, kind: Answer<'_>) -> Result<bool> {
    let answer = kind.parse(answer)?;
    let expected = kind.parse(expected)?;
    if let Answer::Numeric = kind {
        return Ok(match (evaluate_numeric(&answer), evaluate_numeric(&expected)) {
            (Ok(a), Ok(b)) => a.is_approximately_equal_to(&b),
            (a, b) => {
                trace!("cannot compare values {a:?} and {b:?}");
                false
            }
        });
    }
    Ok(
        match (reduce_to_polynomial(&answer), reduce_to_polynomial(&expected)) {
            (Some(a), Some(b)) => a == b,
            _ => to_comparable_operation(&answer) == to_comparable_operation(&expected),
        },
    )
}

/// Two equations are equivalent when `lhs - rhs` of one is a non-zero constant multiple of the
/// other's. Sides that are not polynomial are compared in commutative form, in either orientation.
pub fn equation_is_equivalent_to(
    answer: &str,
    expected: &str,
    variables: &[&str],
) -> Result<bool> {
    let mode = ErrorCheckingMode::RequiredOnly;
    let answer = parse_algebraic_equation(answer, variables, mode)?;
    let expected = parse_algebraic_equation(expected, variables, mode)?;
    Ok(match (answer.to_polynomial(), expected.to_polynomial()) {
        (Some(a), Some(b)) => is_constant_multiple(&a, &b),
        _ => same_sides(&answer, &expected),
    })
}

fn is_constant_multiple(a: &Polynomial, b: &Polynomial) -> bool {
    match (a.leading_term(), b.leading_term()) {
        (None, None) => true,
        (Some(x), Some(y)) => match x.coefficient.checked_div(&y.coefficient) {
            Some(factor) => *a == b.scale(factor),
            None => false,
        },
        _ => false,
    }
}

fn same_sides(a: &Equation, b: &Equation) -> bool {
    let (al, ar) = (to_comparable_operation(&a.lhs), to_comparable_operation(&a.rhs));
    let (bl, br) = (to_comparable_operation(&b.lhs), to_comparable_operation(&b.rhs));
    (al == bl && ar == br) || (al == br && ar == bl)
}
