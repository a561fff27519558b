//! String-based convenience API for quick experimentation.

pub use crate::ui::{
    comparable, equation_is_equivalent_to, eval, evaluate, is_equivalent_to, matches_exactly,
    matches_up_to_trivial_manipulations, parse, parse_equation, parse_with_variables, poly,
    pretty, reduce, Answer,
};
