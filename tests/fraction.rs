use mathexpr::{Fraction, FractionParseError};

fn fraction(input: &str) -> Fraction {
    input.parse().expect("parse fraction")
}

#[test]
fn parses_whole_improper_and_mixed_forms() {
    assert_eq!(fraction("5"), Fraction::new(false, 5, 0, 1));
    assert_eq!(fraction("3/2"), Fraction::new(false, 0, 3, 2));
    assert_eq!(fraction("1 1/2"), Fraction::new(false, 1, 1, 2));
    assert_eq!(fraction("-7/2"), Fraction::new(true, 0, 7, 2));
    assert_eq!(fraction(" -1 3/4 "), Fraction::new(true, 1, 3, 4));
}

#[test]
fn rejects_malformed_fractions() {
    assert_eq!("".parse::<Fraction>(), Err(FractionParseError::Empty));
    assert_eq!("4/0".parse::<Fraction>(), Err(FractionParseError::ZeroDenominator));
    assert!(matches!(
        "1/2/3".parse::<Fraction>(),
        Err(FractionParseError::Malformed(_))
    ));
    assert!(matches!(
        "x/2".parse::<Fraction>(),
        Err(FractionParseError::Malformed(_))
    ));
}

#[test]
fn written_shape_is_kept() {
    assert_ne!(fraction("3/1"), fraction("3"));
    assert_ne!(fraction("6/4"), fraction("3/2"));
    assert!(fraction("3").is_only_whole_number());
    assert!(!fraction("3/1").is_only_whole_number());
}

#[test]
fn proper_and_improper_forms() {
    assert_eq!(fraction("6/4").to_proper_form(), Some(fraction("1 1/2")));
    assert_eq!(fraction("1 1/2").to_improper_form(), Some(fraction("3/2")));
    assert_eq!(fraction("-2 1/3").to_improper_form(), Some(fraction("-7/3")));
    assert_eq!(fraction("1650/209").to_simplest_form(), Some(fraction("150/19")));
    assert_eq!(fraction("3/1").to_proper_form(), Some(fraction("3")));
}

#[test]
fn arithmetic_reduces_to_proper_form() {
    let sum = fraction("1/2").checked_add(&fraction("3/4")).expect("sum");
    assert_eq!(sum, fraction("1 1/4"));

    let difference = fraction("1/3").checked_sub(&fraction("1/2")).expect("difference");
    assert_eq!(difference, fraction("-1/6"));

    let product = fraction("-2/3").checked_mul(&fraction("-3/4")).expect("product");
    assert_eq!(product, fraction("1/2"));

    assert_eq!(fraction("1/2").checked_div(&fraction("0")), None);
    assert_eq!(fraction("2/3").reciprocal(), Some(fraction("1 1/2")));
}

#[test]
fn powers() {
    assert_eq!(fraction("2/3").checked_pow(2), Some(fraction("4/9")));
    assert_eq!(fraction("2/3").checked_pow(-1), Some(fraction("1 1/2")));
    assert_eq!(fraction("0").checked_pow(-2), None);
    assert_eq!(fraction("-1").checked_pow(3), Some(Fraction::whole_number(-1)));
    assert_eq!(fraction("3/2").checked_pow(1000), None);
}

#[test]
fn display() {
    assert_eq!(fraction("3/2").to_string(), "3/2");
    assert_eq!(fraction("1 1/2").to_string(), "1 1/2");
    assert_eq!(fraction("-7").to_string(), "-7");
    assert_eq!(fraction("3/1").to_string(), "3");
    assert_eq!(Fraction::of(-6, 4).to_string(), "-1 1/2");
}

#[test]
fn float_value() {
    assert_eq!(fraction("-1 1/4").to_f64(), -1.25);
    assert_eq!(fraction("-1 1/4").to_whole_number(), -1);
}
