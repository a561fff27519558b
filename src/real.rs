//! Exact-or-floating numeric values.
//!
//! [`Real`] promotes by representation: two integers stay an integer (except for inexact
//! division), anything touching a [`Fraction`] stays rational, and anything touching a float
//! becomes [`Real::Irrational`]. Exact operations that have no real answer return `None`;
//! float operations follow IEEE semantics and produce NaN instead.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use log::debug;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Pow, Signed, ToPrimitive, Zero};

use crate::fraction::Fraction;

/// Tolerance used when comparing reals by value.
pub const EPSILON: f64 = 1e-5;

/// Equality is structural: `Integer(2)` and `Rational(2)` differ. Use
/// [`Real::is_approximately_equal_to`] for value equality.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Real {
    Integer(i64),
    Rational(Fraction),
    Irrational(f64),
}

impl Real {
    pub fn is_rational(&self) -> bool {
        !matches!(self, Real::Irrational(_))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Real::Integer(value) => *value < 0,
            Real::Rational(fraction) => fraction.is_negative(),
            Real::Irrational(value) => *value < 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Real::Integer(value) => *value == 0,
            Real::Rational(fraction) => fraction.is_zero(),
            Real::Irrational(value) => *value == 0.0,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Real::Irrational(value) if value.is_nan())
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Real::Integer(value) => *value as f64,
            Real::Rational(fraction) => fraction.to_f64(),
            Real::Irrational(value) => *value,
        }
    }

    /// The value as a signed integer, if it is an exact whole number (`6/2` counts).
    pub fn as_whole_number(&self) -> Option<i64> {
        match self {
            Real::Integer(value) => Some(*value),
            Real::Rational(fraction) => {
                let ratio = fraction.to_ratio();
                if ratio.is_integer() {
                    ratio.to_integer().to_i64()
                } else {
                    None
                }
            }
            Real::Irrational(_) => None,
        }
    }

    /// Whole-valued fractions become integers; everything else is returned unchanged.
    pub fn simplified(&self) -> Real {
        match self {
            Real::Rational(_) => self.as_whole_number().map_or(*self, Real::Integer),
            other => *other,
        }
    }

    pub fn is_approximately_equal_to(&self, other: &Real) -> bool {
        self.is_approximately_equal_to_within(other, EPSILON)
    }

    pub fn is_approximately_equal_to_within(&self, other: &Real, epsilon: f64) -> bool {
        (self.to_f64() - other.to_f64()).abs() < epsilon
    }

    pub fn is_approximately_zero(&self) -> bool {
        self.to_f64().abs() < EPSILON
    }

    /// Total order by value; NaN sorts per [`f64::total_cmp`].
    pub fn total_cmp(&self, other: &Real) -> Ordering {
        match (self, other) {
            (Real::Integer(a), Real::Integer(b)) => a.cmp(b),
            (Real::Irrational(_), _) | (_, Real::Irrational(_)) => {
                self.to_f64().total_cmp(&other.to_f64())
            }
            _ => match (self.to_ratio(), other.to_ratio()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.to_f64().total_cmp(&other.to_f64()),
            },
        }
    }

    /// Division that reports an exact-zero divisor as `None` instead of panicking.
    ///
    /// A float zero divisor is not an error and yields a signed infinity (or NaN for `0/0.0`).
    pub fn checked_div(&self, rhs: &Real) -> Option<Real> {
        if rhs.is_rational() && rhs.is_zero() {
            return None;
        }
        Some(match (self, rhs) {
            (Real::Integer(a), Real::Integer(b)) => {
                if a.checked_rem(*b) == Some(0) {
                    match a.checked_div(*b) {
                        Some(quotient) => Real::Integer(quotient),
                        None => promoted(*a as f64 / *b as f64),
                    }
                } else {
                    Real::Rational(Fraction::of(*a, *b))
                }
            }
            (Real::Irrational(_), _) | (_, Real::Irrational(_)) => {
                Real::Irrational(self.to_f64() / rhs.to_f64())
            }
            _ => exact_fraction_op(self, rhs, Fraction::checked_div, |a, b| a / b),
        })
    }

    /// Raises `self` to `exponent`.
    ///
    /// Exact bases with a rational exponent `p/q` take an exact `q`-th root when one exists and
    /// fall back to a float otherwise. Returns `None` when the answer is undefined over the reals
    /// for an exact base: an even root of a negative number, or zero to a negative power.
    pub fn pow(&self, exponent: &Real) -> Option<Real> {
        match exponent {
            Real::Integer(power) => self.pow_integer(*power),
            Real::Rational(fraction) => {
                let (numer, denom) = fraction.signed_parts();
                match (numer.to_i64(), denom.to_i64()) {
                    (Some(numer), Some(1)) => self.pow_integer(numer),
                    (Some(numer), Some(denom)) => self.pow_rational(numer, denom),
                    _ => Some(Real::Irrational(self.to_f64().powf(exponent.to_f64()))),
                }
            }
            Real::Irrational(power) => Some(Real::Irrational(self.to_f64().powf(*power))),
        }
    }

    pub fn sqrt(&self) -> Option<Real> {
        self.pow(&Real::Rational(Fraction::of(1, 2)))
    }

    fn pow_integer(&self, power: i64) -> Option<Real> {
        match self {
            Real::Integer(base) if power >= 0 => Some(
                u32::try_from(power)
                    .ok()
                    .and_then(|power| base.checked_pow(power))
                    .map_or_else(|| promoted((*base as f64).powf(power as f64)), Real::Integer),
            ),
            Real::Integer(base) => {
                if *base == 0 {
                    return None;
                }
                Some(pow_fraction(&Fraction::whole_number(*base), power))
            }
            Real::Rational(fraction) => {
                if power < 0 && fraction.is_zero() {
                    return None;
                }
                Some(pow_fraction(fraction, power))
            }
            Real::Irrational(base) => Some(Real::Irrational(match i32::try_from(power) {
                Ok(power) => base.powi(power),
                Err(_) => base.powf(power as f64),
            })),
        }
    }

    fn pow_rational(&self, numer: i64, denom: i64) -> Option<Real> {
        let ratio = match self {
            Real::Irrational(base) => {
                return Some(Real::Irrational(base.powf(numer as f64 / denom as f64)));
            }
            exact => exact.to_ratio()?,
        };
        if ratio.is_negative() && denom % 2 == 0 {
            return None;
        }
        if ratio.is_zero() && numer < 0 {
            return None;
        }
        // Past 64 the exact power cannot fit a fraction, so skip straight to the float.
        let root = u32::try_from(denom)
            .ok()
            .filter(|_| numer.unsigned_abs() <= 64)
            .and_then(|n| exact_root(&ratio, n));
        match root {
            Some(root) => {
                let power = i32::try_from(numer).ok()?;
                let value = Pow::pow(root, power);
                let keep_integer = matches!(self, Real::Integer(_));
                Some(Real::from_ratio(&value, keep_integer))
            }
            None => {
                let magnitude = ratio.abs().to_f64()?.powf(numer as f64 / denom as f64);
                let flips = ratio.is_negative() && numer % 2 != 0;
                Some(Real::Irrational(if flips { -magnitude } else { magnitude }))
            }
        }
    }

    pub(crate) fn to_ratio(&self) -> Option<BigRational> {
        match self {
            Real::Integer(value) => Some(BigRational::from_integer(BigInt::from(*value))),
            Real::Rational(fraction) => Some(fraction.to_ratio()),
            Real::Irrational(_) => None,
        }
    }

    /// Exact value for `ratio`: an integer when requested and whole, a fraction otherwise,
    /// and a float only if the parts overflow.
    pub(crate) fn from_ratio(ratio: &BigRational, keep_integer: bool) -> Real {
        if keep_integer && ratio.is_integer() {
            if let Some(value) = ratio.to_integer().to_i64() {
                return Real::Integer(value);
            }
        }
        match Fraction::from_ratio(ratio) {
            Some(fraction) => Real::Rational(fraction),
            None => promoted(ratio.to_f64().unwrap_or(f64::NAN)),
        }
    }

    fn to_fraction(self) -> Option<Fraction> {
        match self {
            Real::Integer(value) => Some(Fraction::whole_number(value)),
            Real::Rational(fraction) => Some(fraction),
            Real::Irrational(_) => None,
        }
    }
}

/// Exact `n`-th root of a non-negative or odd-rooted rational, if both parts are perfect powers.
fn exact_root(ratio: &BigRational, n: u32) -> Option<BigRational> {
    let numer = ratio.numer().abs();
    let denom = ratio.denom().abs();
    let numer_root = numer.nth_root(n);
    let denom_root = denom.nth_root(n);
    if Pow::pow(&numer_root, n) != numer || Pow::pow(&denom_root, n) != denom {
        return None;
    }
    let root = BigRational::new(numer_root, denom_root);
    Some(if ratio.is_negative() { -root } else { root })
}

fn pow_fraction(base: &Fraction, power: i64) -> Real {
    base.checked_pow(power)
        .map_or_else(|| promoted(base.to_f64().powf(power as f64)), Real::Rational)
}

fn exact_fraction_op(
    lhs: &Real,
    rhs: &Real,
    exact: fn(&Fraction, &Fraction) -> Option<Fraction>,
    float: fn(f64, f64) -> f64,
) -> Real {
    match (lhs.to_fraction(), rhs.to_fraction()) {
        (Some(a), Some(b)) => exact(&a, &b)
            .map_or_else(|| promoted(float(lhs.to_f64(), rhs.to_f64())), Real::Rational),
        _ => Real::Irrational(float(lhs.to_f64(), rhs.to_f64())),
    }
}

fn promoted(value: f64) -> Real {
    debug!("exact arithmetic overflowed; promoting to irrational {value}");
    Real::Irrational(value)
}

fn binary(
    lhs: Real,
    rhs: Real,
    integer: fn(i64, i64) -> Option<i64>,
    exact: fn(&Fraction, &Fraction) -> Option<Fraction>,
    float: fn(f64, f64) -> f64,
) -> Real {
    match (lhs, rhs) {
        (Real::Integer(a), Real::Integer(b)) => {
            integer(a, b).map_or_else(|| promoted(float(a as f64, b as f64)), Real::Integer)
        }
        _ => exact_fraction_op(&lhs, &rhs, exact, float),
    }
}

impl Add for Real {
    type Output = Real;
    fn add(self, rhs: Real) -> Real {
        binary(self, rhs, i64::checked_add, Fraction::checked_add, |a, b| a + b)
    }
}

impl Sub for Real {
    type Output = Real;
    fn sub(self, rhs: Real) -> Real {
        binary(self, rhs, i64::checked_sub, Fraction::checked_sub, |a, b| a - b)
    }
}

impl Mul for Real {
    type Output = Real;
    fn mul(self, rhs: Real) -> Real {
        binary(self, rhs, i64::checked_mul, Fraction::checked_mul, |a, b| a * b)
    }
}

impl Div for Real {
    type Output = Real;

    /// Panics on an exact-zero divisor; see [`Real::checked_div`].
    fn div(self, rhs: Real) -> Real {
        match self.checked_div(&rhs) {
            Some(quotient) => quotient,
            None => panic!("attempted to divide {self} by exact zero"),
        }
    }
}

impl Neg for Real {
    type Output = Real;
    fn neg(self) -> Real {
        match self {
            Real::Integer(value) => value
                .checked_neg()
                .map_or_else(|| promoted(-(value as f64)), Real::Integer),
            Real::Rational(fraction) => Real::Rational(fraction.negated()),
            Real::Irrational(value) => Real::Irrational(-value),
        }
    }
}

impl From<i64> for Real {
    fn from(value: i64) -> Self {
        Real::Integer(value)
    }
}

impl From<Fraction> for Real {
    fn from(value: Fraction) -> Self {
        Real::Rational(value)
    }
}

impl From<f64> for Real {
    fn from(value: f64) -> Self {
        Real::Irrational(value)
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Real::Integer(value) => write!(f, "{value}"),
            Real::Rational(fraction) => write!(f, "{fraction}"),
            Real::Irrational(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod real_tests {
    use super::*;

    #[test]
    fn exact_root_handles_odd_roots_of_negatives() {
        let ratio = BigRational::from_integer(BigInt::from(-27));
        let root = exact_root(&ratio, 3).expect("perfect cube");
        assert_eq!(root, BigRational::from_integer(BigInt::from(-3)));
    }

    #[test]
    fn exact_root_rejects_imperfect_powers() {
        let ratio = BigRational::new(BigInt::from(2), BigInt::from(9));
        assert!(exact_root(&ratio, 2).is_none());
    }

    #[test]
    fn exact_root_of_a_fraction() {
        let ratio = BigRational::new(BigInt::from(8), BigInt::from(27));
        let root = exact_root(&ratio, 3).expect("perfect cube");
        assert_eq!(root, BigRational::new(BigInt::from(2), BigInt::from(3)));
    }
}
