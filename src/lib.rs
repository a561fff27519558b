//! Parsing, exact evaluation and symbolic comparison of learner-entered math expressions.

pub mod comparable;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod fraction;
pub mod parser;
pub mod polynomial;
pub mod prelude;
pub mod real;
pub mod tokenizer;
pub mod ui;

pub use comparable::{
    to_comparable_operation, AccumulationKind, ComparableKind, ComparableOperation,
    NonCommutativeOperation,
};
pub use error::{
    EvalError, FractionParseError, MathError, OptionalRule, ParseError, RequiredRule, Result,
};
pub use eval::{evaluate, evaluate_numeric, Environment};
pub use expr::{
    add, constant, div, group, mul, neg, pos, pow, sqrt, sub, variable, Equation, Expr, Function,
};
pub use format::{pretty, pretty_polynomial};
pub use fraction::Fraction;
pub use parser::{
    parse_algebraic_equation, parse_algebraic_expression, parse_algebraic_expression_with_limit,
    parse_numeric_expression, parse_numeric_expression_with_limit, ErrorCheckingMode,
    MAX_EXPONENT, MAX_NESTING_DEPTH, MAX_TOKENS,
};
pub use polynomial::{reduce_to_polynomial, Polynomial, Term, Variable};
pub use real::{Real, EPSILON};
