//! Formatting helpers for rendering expressions and polynomials.

pub mod expr;
pub mod polynomial;

pub use expr::pretty;
pub use polynomial::pretty_polynomial;
