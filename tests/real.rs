use mathexpr::{Fraction, Real};

fn half() -> Real {
    Real::Rational(Fraction::of(1, 2))
}

#[test]
fn integer_arithmetic_stays_exact() {
    assert_eq!(Real::Integer(3) + Real::Integer(4), Real::Integer(7));
    assert_eq!(Real::Integer(3) - Real::Integer(4), Real::Integer(-1));
    assert_eq!(Real::Integer(3) * Real::Integer(4), Real::Integer(12));
    assert_eq!(Real::Integer(8) / Real::Integer(4), Real::Integer(2));
}

#[test]
fn inexact_integer_division_gives_a_fraction() {
    assert_eq!(
        Real::Integer(6) / Real::Integer(4),
        Real::Rational(Fraction::of(3, 2))
    );
    assert_eq!(
        Real::Integer(-1).checked_div(&Real::Integer(3)),
        Some(Real::Rational(Fraction::of(-1, 3)))
    );
}

#[test]
fn rationals_promote_and_floats_win() {
    let sum = Real::Integer(1) + half();
    assert!(matches!(sum, Real::Rational(_)));
    assert!(sum.is_approximately_equal_to(&Real::Irrational(1.5)));

    let mixed = half() + Real::Irrational(0.25);
    assert!(matches!(mixed, Real::Irrational(_)));
    assert!(mixed.is_approximately_equal_to(&Real::Irrational(0.75)));
}

#[test]
fn overflow_promotes_to_irrational() {
    let product = Real::Integer(i64::MAX) * Real::Integer(2);
    assert!(matches!(product, Real::Irrational(_)));
    assert!(product.to_f64() > 1.8e19);
}

#[test]
fn exact_zero_division_is_checked() {
    assert_eq!(Real::Integer(1).checked_div(&Real::Integer(0)), None);
    assert_eq!(half().checked_div(&Real::Rational(Fraction::of(0, 3))), None);
}

#[test]
#[should_panic]
fn exact_zero_division_operator_panics() {
    let _ = Real::Integer(1) / Real::Integer(0);
}

#[test]
fn float_zero_division_is_infinite() {
    let value = Real::Integer(1)
        .checked_div(&Real::Irrational(0.0))
        .expect("float division");
    assert_eq!(value.to_f64(), f64::INFINITY);
    let value = Real::Integer(-1)
        .checked_div(&Real::Irrational(0.0))
        .expect("float division");
    assert_eq!(value.to_f64(), f64::NEG_INFINITY);
}

#[test]
fn integer_powers() {
    assert_eq!(Real::Integer(4).pow(&Real::Integer(5)), Some(Real::Integer(1024)));
    assert_eq!(
        Real::Integer(2).pow(&Real::Integer(-2)),
        Some(Real::Rational(Fraction::of(1, 4)))
    );
    assert_eq!(Real::Integer(0).pow(&Real::Integer(-1)), None);
}

#[test]
fn square_roots() {
    assert_eq!(Real::Integer(9).sqrt(), Some(Real::Integer(3)));
    assert_eq!(
        Real::Rational(Fraction::of(4, 9)).sqrt(),
        Some(Real::Rational(Fraction::of(2, 3)))
    );
    let root = Real::Integer(2).sqrt().expect("irrational root");
    assert!(matches!(root, Real::Irrational(_)));
    assert!(root.is_approximately_equal_to(&Real::Irrational(std::f64::consts::SQRT_2)));
}

#[test]
fn even_roots_of_negatives() {
    assert_eq!(Real::Integer(-2).sqrt(), None);
    assert_eq!(Real::Rational(Fraction::of(-1, 4)).sqrt(), None);

    let value = Real::Irrational(-2.7).sqrt().expect("float root");
    assert!(value.is_nan());
}

#[test]
fn odd_roots_of_negatives() {
    let cube_root = Real::Integer(-8).pow(&Real::Rational(Fraction::of(1, 3)));
    assert_eq!(cube_root, Some(Real::Integer(-2)));
}

#[test]
fn huge_rational_exponents_fall_back_to_floats() {
    let power = Real::Integer(4).pow(&Real::Rational(Fraction::of(200_000_001, 2)));
    assert_eq!(power, Some(Real::Irrational(f64::INFINITY)));

    let small = Real::Integer(4).pow(&Real::Rational(Fraction::of(5, 2)));
    assert_eq!(small, Some(Real::Integer(32)));
}

#[test]
fn approximate_equality_ignores_representation() {
    let third = Real::Rational(Fraction::of(1, 3));
    assert!(third.is_approximately_equal_to(&Real::Irrational(0.333_333_3)));
    assert!(!third.is_approximately_equal_to(&Real::Irrational(0.3)));
    assert!(third.is_approximately_equal_to_within(&Real::Irrational(0.3), 0.05));
    assert_ne!(Real::Integer(2), Real::Irrational(2.0));
}

#[test]
fn whole_fractions_simplify_to_integers() {
    let whole = Real::Rational(Fraction::new(false, 0, 6, 2));
    assert_eq!(whole.as_whole_number(), Some(3));
    assert_eq!(whole.simplified(), Real::Integer(3));
    assert_eq!(half().simplified(), half());
}

#[test]
fn display() {
    assert_eq!(Real::Integer(-4).to_string(), "-4");
    assert_eq!(Real::Rational(Fraction::of(3, 2)).to_string(), "1 1/2");
    assert_eq!(Real::Irrational(2.5).to_string(), "2.5");
}
