use crate::format::expr::plain_real;
use crate::polynomial::{Polynomial, Term, Variable};
use crate::real::Real;

/// Renders a polynomial as plain text, e.g. `x^2y - (3/2)x + 4`. Unit coefficients are omitted
/// on terms that have variables, and the zero polynomial renders as `0`.
pub fn pretty_polynomial(poly: &Polynomial) -> String {
    let mut out = String::new();
    for (i, term) in poly.terms().iter().enumerate() {
        let negative = term.coefficient.is_negative();
        match (i, negative) {
            (0, true) => out.push('-'),
            (0, false) => {}
            (_, true) => out.push_str(" - "),
            (_, false) => out.push_str(" + "),
        }
        let magnitude = if negative {
            -term.coefficient
        } else {
            term.coefficient
        };
        out.push_str(&show_term(&magnitude, term));
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

fn show_term(magnitude: &Real, term: &Term) -> String {
    let variables: String = term.variables.iter().map(show_variable).collect();
    if variables.is_empty() {
        return plain_real(magnitude);
    }
    if magnitude.is_rational() && magnitude.as_whole_number() == Some(1) {
        return variables;
    }
    match magnitude {
        Real::Rational(fraction) if fraction.has_fractional_part() => {
            format!("({}){variables}", plain_real(magnitude))
        }
        _ => format!("{}{variables}", plain_real(magnitude)),
    }
}

fn show_variable(variable: &Variable) -> String {
    if variable.power == 1 {
        variable.name.clone()
    } else {
        format!("{}^{}", variable.name, variable.power)
    }
}
