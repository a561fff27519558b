//! Mixed-number fractions.
//!
//! A [`Fraction`] keeps the exact shape it was written in: `3/1`, `6/2` and `1 1/2` are all
//! distinct values even when they denote the same number. Arithmetic goes through
//! [`BigRational`] and always hands back a reduced, proper-form result.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use nom::branch::alt;
use nom::character::complete::{char, digit1, multispace0, multispace1};
use nom::combinator::{all_consuming, map, map_res, opt};
use nom::error::VerboseError;
use nom::sequence::{delimited, pair, separated_pair, terminated};
use nom::IResult;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

use crate::error::FractionParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fraction {
    pub negative: bool,
    pub whole: u64,
    pub numerator: u64,
    pub denominator: u64,
}

impl Fraction {
    /// Builds a fraction from its raw parts without reducing it.
    ///
    /// Panics when `denominator` is zero; a zero denominator is a programming error, never user
    /// input (the text parser rejects it).
    pub fn new(negative: bool, whole: u64, numerator: u64, denominator: u64) -> Self {
        assert!(denominator != 0, "fraction denominator must be non-zero");
        Fraction {
            negative,
            whole,
            numerator,
            denominator,
        }
    }

    pub fn whole_number(value: i64) -> Self {
        Fraction::new(value < 0, value.unsigned_abs(), 0, 1)
    }

    /// `numerator / denominator` with the sign taken from the arguments, in proper form.
    pub fn of(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "fraction denominator must be non-zero");
        let (n, d) = (numerator.unsigned_abs(), denominator.unsigned_abs());
        let divisor = n.gcd(&d);
        let (n, d) = (n / divisor, d / divisor);
        Fraction::new((numerator < 0) != (denominator < 0) && n != 0, n / d, n % d, d)
    }

    /// True when there is no fractional component, regardless of numeric value (`3/1` is not).
    pub fn is_only_whole_number(&self) -> bool {
        self.numerator == 0
    }

    pub fn has_fractional_part(&self) -> bool {
        self.numerator != 0
    }

    pub fn is_zero(&self) -> bool {
        self.whole == 0 && self.numerator == 0
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// The signed whole-number component (zero for improper fractions such as `3/1`).
    pub fn to_whole_number(&self) -> i64 {
        let whole = self.whole as i64;
        if self.negative {
            -whole
        } else {
            whole
        }
    }

    pub fn to_f64(&self) -> f64 {
        let magnitude = self.whole as f64 + self.numerator as f64 / self.denominator as f64;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Folds the whole component into the numerator. `None` if the numerator overflows.
    pub fn to_improper_form(&self) -> Option<Fraction> {
        let numerator = self
            .whole
            .checked_mul(self.denominator)?
            .checked_add(self.numerator)?;
        Some(Fraction::new(self.negative, 0, numerator, self.denominator))
    }

    /// Reduced mixed number: `6/4` becomes `1 1/2`, `3/1` becomes `3`.
    /// `None` only when an improper numerator pushes the whole part past `u64`.
    pub fn to_proper_form(&self) -> Option<Fraction> {
        Fraction::from_ratio(&self.to_ratio())
    }

    /// Reduced improper fraction: `1650/209` becomes `150/19`.
    pub fn to_simplest_form(&self) -> Option<Fraction> {
        self.to_proper_form()?.to_improper_form()
    }

    pub fn checked_add(&self, other: &Fraction) -> Option<Fraction> {
        Fraction::from_ratio(&(self.to_ratio() + other.to_ratio()))
    }

    pub fn checked_sub(&self, other: &Fraction) -> Option<Fraction> {
        Fraction::from_ratio(&(self.to_ratio() - other.to_ratio()))
    }

    pub fn checked_mul(&self, other: &Fraction) -> Option<Fraction> {
        Fraction::from_ratio(&(self.to_ratio() * other.to_ratio()))
    }

    /// `None` when `other` is zero or the result does not fit.
    pub fn checked_div(&self, other: &Fraction) -> Option<Fraction> {
        if other.is_zero() {
            return None;
        }
        Fraction::from_ratio(&(self.to_ratio() / other.to_ratio()))
    }

    /// Exact integer power; a negative exponent gives the reciprocal. `None` for `0^-n` or
    /// when the result does not fit.
    pub fn checked_pow(&self, exponent: i64) -> Option<Fraction> {
        let ratio = self.to_ratio();
        if ratio.is_zero() {
            return match exponent.cmp(&0) {
                Ordering::Less => None,
                Ordering::Equal => Some(Fraction::whole_number(1)),
                Ordering::Greater => Some(Fraction::whole_number(0)),
            };
        }
        if ratio.abs().is_one() {
            let flips = ratio.is_negative() && exponent % 2 != 0;
            return Some(Fraction::whole_number(if flips { -1 } else { 1 }));
        }
        // Past 64 the result cannot fit the u64 parts.
        let exp = i32::try_from(exponent)
            .ok()
            .filter(|exp| exp.unsigned_abs() <= 64)?;
        Fraction::from_ratio(&Pow::pow(ratio, exp))
    }

    pub fn negated(&self) -> Fraction {
        let mut negated = *self;
        negated.negative = !self.negative && !self.is_zero();
        negated
    }

    pub fn reciprocal(&self) -> Option<Fraction> {
        Fraction::whole_number(1).checked_div(self)
    }

    pub(crate) fn to_ratio(&self) -> BigRational {
        let whole = BigInt::from(self.whole) * BigInt::from(self.denominator);
        let magnitude = BigRational::new(
            whole + BigInt::from(self.numerator),
            BigInt::from(self.denominator),
        );
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Reduced proper-form fraction for `ratio`, or `None` if a part exceeds `u64`.
    pub(crate) fn from_ratio(ratio: &BigRational) -> Option<Fraction> {
        let negative = ratio.is_negative();
        let magnitude = ratio.abs();
        let (whole, remainder) = magnitude.numer().div_rem(magnitude.denom());
        Some(Fraction::new(
            negative,
            whole.to_u64()?,
            remainder.to_u64()?,
            magnitude.denom().to_u64()?,
        ))
    }

    /// Numerator and denominator of the improper form as exact integers.
    pub(crate) fn signed_parts(&self) -> (BigInt, BigInt) {
        let ratio = self.to_ratio();
        (ratio.numer().clone(), ratio.denom().clone())
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-")?;
        }
        if self.numerator == 0 {
            write!(f, "{}", self.whole)
        } else if self.denominator == 1 {
            write!(f, "{}", self.whole + self.numerator)
        } else if self.whole == 0 {
            write!(f, "{}/{}", self.numerator, self.denominator)
        } else {
            write!(f, "{} {}/{}", self.whole, self.numerator, self.denominator)
        }
    }
}

impl FromStr for Fraction {
    type Err = FractionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(FractionParseError::Empty);
        }
        let (_, (negative, (whole, numerator, denominator))) =
            all_consuming(delimited(multispace0, parse_signed_fraction, multispace0))(input)
                .map_err(|_| FractionParseError::Malformed(input.to_string()))?;
        if denominator == 0 {
            return Err(FractionParseError::ZeroDenominator);
        }
        Ok(Fraction::new(negative, whole, numerator, denominator))
    }
}

type FractionParts = (u64, u64, u64);

fn parse_signed_fraction(input: &str) -> IResult<&str, (bool, FractionParts), VerboseError<&str>> {
    pair(
        map(opt(terminated(char('-'), multispace0)), |sign| sign.is_some()),
        alt((parse_mixed, parse_improper, parse_whole)),
    )(input)
}

fn parse_mixed(input: &str) -> IResult<&str, FractionParts, VerboseError<&str>> {
    map(
        separated_pair(parse_u64, multispace1, parse_ratio),
        |(whole, (numerator, denominator))| (whole, numerator, denominator),
    )(input)
}

fn parse_improper(input: &str) -> IResult<&str, FractionParts, VerboseError<&str>> {
    map(parse_ratio, |(numerator, denominator)| (0, numerator, denominator))(input)
}

fn parse_whole(input: &str) -> IResult<&str, FractionParts, VerboseError<&str>> {
    map(parse_u64, |whole| (whole, 0, 1))(input)
}

fn parse_ratio(input: &str) -> IResult<&str, (u64, u64), VerboseError<&str>> {
    separated_pair(
        parse_u64,
        delimited(multispace0, char('/'), multispace0),
        parse_u64,
    )(input)
}

fn parse_u64(input: &str) -> IResult<&str, u64, VerboseError<&str>> {
    map_res(digit1, |digits: &str| digits.parse::<u64>())(input)
}

#[cfg(test)]
mod fraction_tests {
    use super::*;

    #[test]
    fn from_ratio_produces_proper_form() {
        let ratio = BigRational::new(BigInt::from(-7), BigInt::from(2));
        let fraction = Fraction::from_ratio(&ratio).expect("fits");
        assert_eq!(fraction, Fraction::new(true, 3, 1, 2));
    }

    #[test]
    fn signed_parts_are_reduced() {
        let (numer, denom) = Fraction::new(false, 1, 2, 4).signed_parts();
        assert_eq!(numer, BigInt::from(3));
        assert_eq!(denom, BigInt::from(2));
    }
}
