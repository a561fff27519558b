use mathexpr::polynomial::MAX_EXPANDED_POWER;
use mathexpr::{
    parse_algebraic_equation, parse_algebraic_expression, reduce_to_polynomial, Environment,
    ErrorCheckingMode, Fraction, Polynomial, Real, Variable,
};

const VARIABLES: &[&str] = &["x", "y", "z"];

fn reduce(input: &str) -> Option<Polynomial> {
    let expr = parse_algebraic_expression(input, VARIABLES, ErrorCheckingMode::RequiredOnly)
        .expect("parse polynomial");
    reduce_to_polynomial(&expr)
}

fn poly(input: &str) -> Polynomial {
    reduce(input).unwrap_or_else(|| panic!("{input} should reduce to a polynomial"))
}

fn expect_reduced(input: &str, expected: &str) {
    let actual = poly(input);
    assert_eq!(actual.to_string(), expected, "reduction mismatch for {input}");
}

#[test]
fn combines_like_terms() {
    expect_reduced("x + 2 + 3x", "4x + 2");
    expect_reduced("2x*3", "6x");
    expect_reduced("x - x", "0");
    expect_reduced("xy + yx", "2xy");
    expect_reduced("x*x*x", "x^3");
}

#[test]
fn expands_products_and_powers() {
    expect_reduced("(x+1)(x-1)", "x^2 - 1");
    expect_reduced("(x+y)^2", "x^2 + 2xy + y^2");
    expect_reduced("(x+1)^3", "x^3 + 3x^2 + 3x + 1");
    expect_reduced("-(x-2)", "-x + 2");
    expect_reduced("(2x^2y)^2", "4x^4y^2");
}

#[test]
fn canonical_term_order() {
    expect_reduced("3 + y + x + xy + xy^2 + x^2y + x^2y^2", "x^2y^2 + x^2y + xy^2 + xy + x + y + 3");
    expect_reduced("3+y+x+yx+x^2y+x^2y^2+y^2x", "x^2y^2 + x^2y + xy^2 + xy + x + y + 3");
    expect_reduced("z + y^3 + x", "x + y^3 + z");
}

#[test]
fn exact_division() {
    expect_reduced("(x^2-1)/(x+1)", "x - 1");
    expect_reduced("(x^3-1)/(x-1)", "x^2 + x + 1");
    expect_reduced("(x^2y + xy^2)/(xy)", "x + y");
    expect_reduced("(4x + 2)/2", "2x + 1");
    expect_reduced("x/2", "(1/2)x");
}

#[test]
fn non_polynomial_reductions_are_rejected() {
    assert_eq!(reduce("(xy+y)/x"), None);
    assert_eq!(reduce("(x^2+1)/(x+1)"), None);
    assert_eq!(reduce("1/x"), None);
    assert_eq!(reduce("x/0"), None);
    assert_eq!(reduce("x^y"), None);
    assert_eq!(reduce("x^-1"), None);
    assert_eq!(reduce("x^0.5"), None);
    assert_eq!(reduce("sqrt(x+1)"), None);
    assert_eq!(reduce("sqrt(-4)"), None);
}

#[test]
fn fractional_powers_of_single_terms() {
    expect_reduced("sqrt(4x^2)", "2x");
    expect_reduced("(8x^6)^(1/3)", "2x^2");
    assert_eq!(reduce("sqrt(x)"), None);
    assert_eq!(reduce("sqrt(-x^2)"), None);
}

#[test]
fn constant_folding() {
    let constant = poly("2^10 - 24");
    assert!(constant.is_constant());
    assert_eq!(constant.constant_value(), Some(Real::Integer(1000)));
    assert_eq!(poly("0x").constant_value(), Some(Real::Integer(0)));
    assert!(poly("x - x").is_zero());
}

#[test]
fn queries() {
    let p = poly("x^2y + 3y - 7");
    assert_eq!(p.degree(), 3);
    assert_eq!(p.variable_names(), vec!["x", "y"]);
    assert!(!p.is_constant());
    assert_eq!(p.constant_value(), None);

    let lead = p.leading_term().expect("leading term");
    assert_eq!(lead.variables, vec![Variable::new("x", 2), Variable::new("y", 1)]);
    assert_eq!(lead.coefficient, Real::Integer(1));
}

#[test]
fn evaluation_matches_the_expression() {
    let p = poly("(x+y)^2");
    let mut env = Environment::new();
    env.insert("x".to_string(), Real::Integer(2));
    env.insert("y".to_string(), Real::Rational(Fraction::of(1, 2)));
    let value = p.evaluate(&env).expect("evaluate");
    assert!(value.is_approximately_equal_to(&Real::Irrational(6.25)));
}

#[test]
fn equality_is_by_value_of_coefficients() {
    assert_eq!(poly("x/2"), poly("0.5x"));
    assert_ne!(poly("x/3"), poly("0.3x"));
    assert_ne!(poly("x"), poly("y"));
}

#[test]
fn arithmetic_operators() {
    let sum = poly("x + 1") + poly("x - 1");
    assert_eq!(sum, poly("2x"));
    let product = (poly("x + y") * poly("x - y")).expect("product");
    assert_eq!(product, poly("x^2 - y^2"));
    let difference = poly("x^2") - poly("x^2 + 1");
    assert_eq!(difference, poly("-1"));
    assert_eq!(-poly("x - 1"), poly("1 - x"));
}

#[test]
fn large_powers_of_sums_are_refused() {
    let input = format!("(x+1)^{}", MAX_EXPANDED_POWER + 1);
    assert_eq!(reduce(&input), None);
    assert!(reduce("(x+1)^10").is_some());
}

#[test]
fn overflowing_variable_powers_are_refused() {
    assert_eq!(reduce("x^4000000000*x^4000000000"), None);
    assert_eq!(reduce("(x^4000000000)^2"), None);
    assert_eq!(reduce("(x^3000000000*y)/(x^2000000000)"), Some(poly("x^1000000000*y")));
    let product = poly("x^4000000000") * poly("x^4000000000");
    assert_eq!(product, None);
}

#[test]
fn rebuilds_an_expression_in_canonical_order() {
    let p = poly("3 - 2x + x^2");
    let rebuilt = reduce_to_polynomial(&p.to_expr()).expect("rebuilt polynomial");
    assert_eq!(rebuilt, p);
    assert_eq!(p.to_expr().to_string(), "x^2 - 2 * x + 3");
}

#[test]
fn equation_polynomial_moves_everything_left() {
    let equation = parse_algebraic_equation("2x + 1 = x - 3", VARIABLES, ErrorCheckingMode::AllErrors)
        .expect("parse equation");
    let p = equation.to_polynomial().expect("polynomial equation");
    assert_eq!(p.to_string(), "x + 4");
}
