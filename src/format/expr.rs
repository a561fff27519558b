use crate::expr::Expr;
use crate::real::Real;

const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const UNARY: u8 = 3;
const POWER: u8 = 4;
const ATOM: u8 = 5;

/// Renders an expression with the fewest parentheses that keep its shape. Explicit groups from
/// the source are always shown.
pub fn pretty(expr: &Expr) -> String {
    fn pp(ctx: u8, expr: &Expr) -> String {
        match expr {
            Expr::Variable(v) => v.clone(),
            Expr::Constant(r) => {
                let (prec, body) = show_constant(r);
                bracket(ctx, prec, body)
            }

            Expr::Add(a, b) => bracket(ctx, SUM, format!("{} + {}", pp(SUM, a), pp(PRODUCT, b))),
            Expr::Sub(a, b) => bracket(ctx, SUM, format!("{} - {}", pp(SUM, a), pp(PRODUCT, b))),

            Expr::Mul(a, b) => bracket(
                ctx,
                PRODUCT,
                format!("{} * {}", pp(PRODUCT, a), pp(UNARY, b)),
            ),
            Expr::Div(a, b) => bracket(
                ctx,
                PRODUCT,
                format!("{} / {}", pp(PRODUCT, a), pp(UNARY, b)),
            ),

            Expr::Pow(a, b) => bracket(ctx, POWER, format!("{}^{}", pp(ATOM, a), pp(UNARY, b))),

            Expr::Neg(a) => bracket(ctx, UNARY, format!("-{}", pp(UNARY, a))),
            Expr::Pos(a) => bracket(ctx, UNARY, format!("+{}", pp(UNARY, a))),

            Expr::Group(a) => format!("({})", pp(0, a)),
            Expr::Call(function, a) => format!("{}({})", function.name(), pp(0, a)),
        }
    }

    pp(0, expr)
}

fn show_constant(value: &Real) -> (u8, String) {
    let body = plain_real(value);
    let prec = match value {
        Real::Rational(fraction) if fraction.has_fractional_part() => PRODUCT,
        other if other.is_negative() => UNARY,
        _ => ATOM,
    };
    (prec, body)
}

/// Plain text for a number; fractions are written improper, e.g. `-3/2`.
pub(crate) fn plain_real(value: &Real) -> String {
    match value {
        Real::Rational(fraction) if fraction.has_fractional_part() => {
            match fraction.to_simplest_form() {
                Some(improper) => format!(
                    "{}{}/{}",
                    if improper.is_negative() { "-" } else { "" },
                    improper.numerator,
                    improper.denominator
                ),
                None => value.to_f64().to_string(),
            }
        }
        other => other.to_string(),
    }
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}
