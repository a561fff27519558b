//! Multivariate polynomials with [`Real`] coefficients.
//!
//! Every [`Polynomial`] is kept canonical: like terms are combined, zero terms and zero powers
//! are dropped, whole-valued fractions become integers and terms are sorted by [`compare_terms`].
//! A reduction that cannot stay polynomial yields `None`.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;

use crate::error::EvalError;
use crate::eval::Environment;
use crate::expr::{Equation, Expr, Function};
use crate::fraction::Fraction;
use crate::real::Real;

/// Multi-term bases are not expanded past this power.
pub const MAX_EXPANDED_POWER: u32 = 256;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub name: String,
    pub power: u32,
}

impl Variable {
    pub fn new(name: impl Into<String>, power: u32) -> Self {
        Variable {
            name: name.into(),
            power,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    pub coefficient: Real,
    pub variables: Vec<Variable>,
}

impl Term {
    pub fn constant(coefficient: Real) -> Self {
        Term {
            coefficient,
            variables: Vec::new(),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn degree(&self) -> u64 {
        self.variables.iter().map(|variable| u64::from(variable.power)).sum()
    }

    /// Monomial product; `None` if a combined power overflows `u32`.
    fn mul(&self, rhs: &Term) -> Option<Term> {
        let mut powers: BTreeMap<&str, u32> = BTreeMap::new();
        for variable in self.variables.iter().chain(&rhs.variables) {
            let power = powers.entry(&variable.name).or_insert(0);
            *power = power.checked_add(variable.power)?;
        }
        Some(Term {
            coefficient: self.coefficient * rhs.coefficient,
            variables: powers
                .into_iter()
                .map(|(name, power)| Variable::new(name, power))
                .collect(),
        })
    }

    /// Exact monomial division; `None` if `rhs` has a variable `self` lacks or a higher power.
    fn div(&self, rhs: &Term) -> Option<Term> {
        let mut powers: BTreeMap<&str, i64> = self
            .variables
            .iter()
            .map(|variable| (variable.name.as_str(), i64::from(variable.power)))
            .collect();
        for variable in &rhs.variables {
            let power = powers.get_mut(variable.name.as_str())?;
            *power -= i64::from(variable.power);
            if *power < 0 {
                return None;
            }
        }
        Some(Term {
            coefficient: self.coefficient.checked_div(&rhs.coefficient)?,
            variables: powers
                .into_iter()
                .filter(|(_, power)| *power > 0)
                .map(|(name, power)| Variable::new(name, power as u32))
                .collect(),
        })
    }

    /// Raises a single term to `numerator/denominator`. Every power times the numerator must
    /// divide evenly by the denominator and stay non-negative.
    fn pow_rational(&self, numerator: i64, denominator: i64) -> Option<Term> {
        let mut variables = Vec::with_capacity(self.variables.len());
        for variable in &self.variables {
            let scaled = i64::from(variable.power).checked_mul(numerator)?;
            if scaled < 0 || scaled % denominator != 0 {
                return None;
            }
            variables.push(Variable::new(
                variable.name.clone(),
                u32::try_from(scaled / denominator).ok()?,
            ));
        }
        let exponent = Real::Rational(Fraction::of(numerator, denominator)).simplified();
        let coefficient = self.coefficient.pow(&exponent)?;
        if coefficient.is_nan() {
            return None;
        }
        Some(Term {
            coefficient,
            variables,
        })
    }
}

/// Lexicographic term order: walk both sorted variable lists together. An earlier name wins,
/// then a higher power; a term whose list runs out first sorts later. Identical signatures fall
/// back to descending coefficient.
pub fn compare_terms(a: &Term, b: &Term) -> Ordering {
    let mut left = a.variables.iter();
    let mut right = b.variables.iter();
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => {
                let ord = x.name.cmp(&y.name).then(y.power.cmp(&x.power));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => return b.coefficient.total_cmp(&a.coefficient),
        }
    }
}

/// The zero polynomial has no terms.
#[derive(Clone, Debug, Default)]
pub struct Polynomial {
    terms: Vec<Term>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial { terms: Vec::new() }
    }

    pub fn one() -> Self {
        Polynomial::from_constant(Real::Integer(1))
    }

    pub fn from_constant(value: Real) -> Self {
        Polynomial::combine(vec![Term::constant(value)])
    }

    pub fn from_variable(name: impl Into<String>) -> Self {
        Polynomial::combine(vec![Term {
            coefficient: Real::Integer(1),
            variables: vec![Variable::new(name, 1)],
        }])
    }

    /// Builds the canonical polynomial for any list of terms, or `None` if merging a term's
    /// repeated variables overflows its power.
    pub fn from_terms(terms: Vec<Term>) -> Option<Self> {
        let terms = terms
            .into_iter()
            .map(|term| {
                Some(Term {
                    coefficient: term.coefficient,
                    variables: normalize_variables(term.variables)?,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Polynomial::combine(terms))
    }

    /// Combines like terms. Each variable list must already be sorted by name, free of repeats
    /// and free of zero powers.
    fn combine(terms: Vec<Term>) -> Self {
        let mut combined: BTreeMap<Vec<Variable>, Real> = BTreeMap::new();
        for term in terms {
            match combined.entry(term.variables) {
                Entry::Vacant(entry) => {
                    entry.insert(term.coefficient);
                }
                Entry::Occupied(mut entry) => {
                    let updated = *entry.get() + term.coefficient;
                    *entry.get_mut() = updated;
                }
            }
        }
        let mut terms: Vec<Term> = combined
            .into_iter()
            .filter(|(_, coefficient)| !is_negligible(coefficient))
            .map(|(variables, coefficient)| Term {
                coefficient: coefficient.simplified(),
                variables,
            })
            .collect();
        terms.sort_by(compare_terms);
        Polynomial { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(Term::is_constant)
    }

    /// The value of a constant polynomial (zero when there are no terms).
    pub fn constant_value(&self) -> Option<Real> {
        match self.terms.as_slice() {
            [] => Some(Real::Integer(0)),
            [term] if term.is_constant() => Some(term.coefficient),
            _ => None,
        }
    }

    /// Highest total degree among the terms.
    pub fn degree(&self) -> u64 {
        self.terms.iter().map(Term::degree).max().unwrap_or(0)
    }

    pub fn variable_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .terms
            .iter()
            .flat_map(|term| term.variables.iter().map(|variable| variable.name.as_str()))
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn leading_term(&self) -> Option<&Term> {
        self.terms.first()
    }

    pub fn evaluate(&self, env: &Environment) -> Result<Real, EvalError> {
        let mut total = Real::Integer(0);
        for term in &self.terms {
            let mut value = term.coefficient;
            for variable in &term.variables {
                let bound = env
                    .get(&variable.name)
                    .ok_or_else(|| EvalError::UnboundVariable(variable.name.clone()))?;
                let raised = bound
                    .pow(&Real::Integer(i64::from(variable.power)))
                    .ok_or(EvalError::Undefined)?;
                value = value * raised;
            }
            total = total + value;
        }
        Ok(total)
    }

    pub fn scale(&self, factor: Real) -> Self {
        Polynomial::combine(
            self.terms
                .iter()
                .map(|term| Term {
                    coefficient: term.coefficient * factor,
                    variables: term.variables.clone(),
                })
                .collect(),
        )
    }

    /// Exact division by leading-term elimination. `None` for a zero divisor or a non-zero
    /// remainder.
    pub fn div_exact(&self, divisor: &Polynomial) -> Option<Polynomial> {
        let divisor_lead = divisor.leading_term()?;
        if divisor.is_constant() {
            let mut quotient = Vec::with_capacity(self.terms.len());
            for term in &self.terms {
                quotient.push(Term {
                    coefficient: term.coefficient.checked_div(&divisor_lead.coefficient)?,
                    variables: term.variables.clone(),
                });
            }
            return Some(Polynomial::combine(quotient));
        }

        let mut quotient = Vec::new();
        let mut remainder = self.clone();
        while let Some(lead) = remainder.terms.first() {
            let Some(step) = lead.div(divisor_lead) else {
                debug!("{self} is not divisible by {divisor}: stuck at {remainder}");
                return None;
            };
            // The leading term is removed outright so that float round-off cannot stall the loop.
            let rest = Polynomial {
                terms: remainder.terms[1..].to_vec(),
            };
            let others = Polynomial {
                terms: divisor.terms[1..].to_vec(),
            };
            remainder = rest - (Polynomial::combine(vec![step.clone()]) * others)?;
            quotient.push(step);
        }
        Some(Polynomial::combine(quotient))
    }

    /// Raises to a polynomial exponent, which must be constant.
    pub fn pow(&self, exponent: &Polynomial) -> Option<Polynomial> {
        let Some(exponent) = exponent.constant_value() else {
            debug!("cannot raise {self} to the non-constant power {exponent}");
            return None;
        };
        self.pow_real(&exponent)
    }

    pub fn pow_real(&self, exponent: &Real) -> Option<Polynomial> {
        if let Some(base) = self.constant_value() {
            let value = base.pow(exponent)?;
            return (!value.is_nan()).then(|| Polynomial::from_constant(value));
        }
        if let Some(power) = exponent.as_whole_number() {
            return match u32::try_from(power) {
                Ok(power) => self.pow_whole(power),
                Err(_) => {
                    debug!("cannot raise non-constant {self} to the power {power}");
                    None
                }
            };
        }
        let Real::Rational(fraction) = exponent else {
            debug!("cannot raise {self} to the irrational power {exponent}");
            return None;
        };
        let [term] = self.terms.as_slice() else {
            debug!("cannot take a fractional power of the multi-term {self}");
            return None;
        };
        let (numerator, denominator) = fraction.signed_parts();
        let numerator = i64::try_from(numerator).ok()?;
        let denominator = i64::try_from(denominator).ok()?;
        term.pow_rational(numerator, denominator)
            .and_then(|term| Polynomial::from_terms(vec![term]))
    }

    pub fn sqrt(&self) -> Option<Polynomial> {
        self.pow_real(&Real::Rational(Fraction::of(1, 2)))
    }

    fn pow_whole(&self, power: u32) -> Option<Polynomial> {
        if let [term] = self.terms.as_slice() {
            let variables = term
                .variables
                .iter()
                .map(|variable| Some(Variable::new(variable.name.clone(), variable.power.checked_mul(power)?)))
                .collect::<Option<Vec<_>>>()?;
            let coefficient = term.coefficient.pow(&Real::Integer(i64::from(power)))?;
            return Polynomial::from_terms(vec![Term {
                coefficient,
                variables,
            }]);
        }
        if power > MAX_EXPANDED_POWER {
            debug!("refusing to expand {self} to the power {power}");
            return None;
        }
        let mut result = Polynomial::one();
        let mut base = self.clone();
        let mut n = power;
        while n > 0 {
            if n % 2 == 1 {
                result = (result * base.clone())?;
            }
            n /= 2;
            if n > 0 {
                base = (base.clone() * base)?;
            }
        }
        Some(result)
    }

    /// Rebuilds an expression in canonical term order.
    pub fn to_expr(&self) -> Expr {
        let mut terms = self.terms.iter();
        let Some(first) = terms.next() else {
            return Expr::integer(0);
        };
        let mut expr = term_to_expr(first.coefficient, &first.variables);
        for term in terms {
            expr = if term.coefficient.is_negative() {
                Expr::Sub(
                    expr.boxed(),
                    term_to_expr(-term.coefficient, &term.variables).boxed(),
                )
            } else {
                Expr::Add(
                    expr.boxed(),
                    term_to_expr(term.coefficient, &term.variables).boxed(),
                )
            };
        }
        expr
    }
}

fn term_to_expr(coefficient: Real, variables: &[Variable]) -> Expr {
    let factors = variables.iter().map(|variable| {
        let base = Expr::Variable(variable.name.clone());
        if variable.power == 1 {
            base
        } else {
            Expr::Pow(base.boxed(), Expr::integer(i64::from(variable.power)).boxed())
        }
    });
    let product = factors.reduce(|acc, factor| Expr::Mul(acc.boxed(), factor.boxed()));
    let unit = coefficient.is_approximately_equal_to(&Real::Integer(1)) && coefficient.is_rational();
    let negative_unit =
        coefficient.is_approximately_equal_to(&Real::Integer(-1)) && coefficient.is_rational();
    match product {
        None => Expr::Constant(coefficient),
        Some(product) if unit => product,
        Some(product) if negative_unit => Expr::Neg(product.boxed()),
        Some(product) => Expr::Mul(Expr::Constant(coefficient).boxed(), product.boxed()),
    }
}

/// Sorts by name, merges repeated names and drops zero powers. `None` if a merged power
/// overflows.
fn normalize_variables(variables: Vec<Variable>) -> Option<Vec<Variable>> {
    let mut powers: BTreeMap<String, u32> = BTreeMap::new();
    for variable in variables {
        let power = powers.entry(variable.name).or_insert(0);
        *power = power.checked_add(variable.power)?;
    }
    Some(
        powers
            .into_iter()
            .filter(|(_, power)| *power > 0)
            .map(|(name, power)| Variable { name, power })
            .collect(),
    )
}

fn is_negligible(coefficient: &Real) -> bool {
    match coefficient {
        Real::Irrational(_) => coefficient.is_approximately_zero(),
        exact => exact.is_zero(),
    }
}

/// Reduces `expr` to canonical polynomial form, or `None` if some part of it is not polynomial.
pub fn reduce_to_polynomial(expr: &Expr) -> Option<Polynomial> {
    match expr {
        Expr::Constant(value) => Some(Polynomial::from_constant(*value)),
        Expr::Variable(name) => Some(Polynomial::from_variable(name.clone())),
        Expr::Add(a, b) => Some(reduce_to_polynomial(a)? + reduce_to_polynomial(b)?),
        Expr::Sub(a, b) => Some(reduce_to_polynomial(a)? - reduce_to_polynomial(b)?),
        Expr::Mul(a, b) => reduce_to_polynomial(a)? * reduce_to_polynomial(b)?,
        Expr::Div(a, b) => {
            let dividend = reduce_to_polynomial(a)?;
            let divisor = reduce_to_polynomial(b)?;
            dividend.div_exact(&divisor)
        }
        Expr::Pow(a, b) => reduce_to_polynomial(a)?.pow(&reduce_to_polynomial(b)?),
        Expr::Neg(a) => Some(-reduce_to_polynomial(a)?),
        Expr::Pos(a) | Expr::Group(a) => reduce_to_polynomial(a),
        Expr::Call(Function::SquareRoot, a) => reduce_to_polynomial(a)?.sqrt(),
    }
}

impl Equation {
    /// Polynomial form of `lhs - rhs`.
    pub fn to_polynomial(&self) -> Option<Polynomial> {
        Some(reduce_to_polynomial(&self.lhs)? - reduce_to_polynomial(&self.rhs)?)
    }
}

impl std::ops::Add for Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: Polynomial) -> Polynomial {
        let mut terms = self.terms;
        terms.extend(rhs.terms);
        Polynomial::combine(terms)
    }
}

impl std::ops::Sub for Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: Polynomial) -> Polynomial {
        self + -rhs
    }
}

/// `None` when a product power no longer fits `u32`.
impl std::ops::Mul for Polynomial {
    type Output = Option<Polynomial>;
    fn mul(self, rhs: Polynomial) -> Option<Polynomial> {
        let mut terms = Vec::with_capacity(self.terms.len() * rhs.terms.len());
        for a in &self.terms {
            for b in &rhs.terms {
                terms.push(a.mul(b)?);
            }
        }
        Some(Polynomial::combine(terms))
    }
}

impl std::ops::Neg for Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .into_iter()
                .map(|term| Term {
                    coefficient: -term.coefficient,
                    variables: term.variables,
                })
                .collect(),
        }
    }
}

/// Same terms in the same order with coefficients equal by value.
impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.terms.len() == other.terms.len()
            && self.terms.iter().zip(&other.terms).all(|(a, b)| {
                a.variables == b.variables && a.coefficient.is_approximately_equal_to(&b.coefficient)
            })
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty_polynomial(self))
    }
}

#[cfg(test)]
mod polynomial_tests {
    use super::*;

    fn term(coefficient: i64, variables: &[(&str, u32)]) -> Term {
        Term {
            coefficient: Real::Integer(coefficient),
            variables: variables
                .iter()
                .map(|(name, power)| Variable::new(*name, *power))
                .collect(),
        }
    }

    #[test]
    fn term_order_prefers_earlier_names_and_higher_powers() {
        assert_eq!(compare_terms(&term(1, &[("x", 2)]), &term(1, &[("x", 1)])), Ordering::Less);
        assert_eq!(compare_terms(&term(1, &[("x", 1)]), &term(1, &[("y", 3)])), Ordering::Less);
        assert_eq!(
            compare_terms(&term(1, &[("x", 1), ("y", 1)]), &term(1, &[("x", 1)])),
            Ordering::Less
        );
        assert_eq!(compare_terms(&term(5, &[]), &term(1, &[("y", 1)])), Ordering::Greater);
        assert_eq!(compare_terms(&term(5, &[]), &term(3, &[])), Ordering::Less);
    }

    #[test]
    fn monomial_division_requires_every_variable() {
        let dividend = term(6, &[("x", 2), ("y", 1)]);
        let quotient = dividend.div(&term(3, &[("x", 1)])).expect("divisible");
        assert_eq!(quotient, term(2, &[("x", 1), ("y", 1)]));
        assert!(dividend.div(&term(1, &[("z", 1)])).is_none());
        assert!(dividend.div(&term(1, &[("y", 2)])).is_none());
    }

    #[test]
    fn normalizing_merges_repeated_variables() {
        let merged = normalize_variables(vec![
            Variable::new("y", 1),
            Variable::new("x", 2),
            Variable::new("y", 2),
            Variable::new("z", 0),
        ]);
        assert_eq!(merged, Some(vec![Variable::new("x", 2), Variable::new("y", 3)]));
    }

    #[test]
    fn overflowing_powers_are_refused() {
        let big = term(1, &[("x", u32::MAX)]);
        assert!(big.mul(&term(2, &[("x", 1)])).is_none());
        assert_eq!(
            big.mul(&term(2, &[("y", 1)])),
            Some(term(2, &[("x", u32::MAX), ("y", 1)]))
        );
        assert!(normalize_variables(vec![Variable::new("x", u32::MAX), Variable::new("x", 1)]).is_none());
        assert!(Polynomial::from_terms(vec![term(1, &[("x", u32::MAX), ("x", 1)])]).is_none());
    }
}
