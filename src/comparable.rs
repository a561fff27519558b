//! Canonical form for comparing expressions up to commutativity and associativity.
//!
//! Sums and products are flattened into accumulations and their operands sorted, so `2*3/4*7`
//! and `7*2*3/4` convert to the same tree. Nothing is evaluated: `1+2+3` and `1+2+2+1` stay
//! different.

use std::cmp::Ordering;

use crate::expr::{Expr, Function};
use crate::real::Real;

#[derive(Clone, Debug, PartialEq)]
pub struct ComparableOperation {
    /// A sign wrapping the whole subtree.
    pub negated: bool,
    /// A reciprocal wrapping the whole subtree.
    pub inverted: bool,
    pub kind: ComparableKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ComparableKind {
    Constant(Real),
    Variable(String),
    Accumulation {
        kind: AccumulationKind,
        operands: Vec<ComparableOperation>,
    },
    NonCommutative(NonCommutativeOperation),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccumulationKind {
    Summation,
    Product,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NonCommutativeOperation {
    Exponentiation {
        base: Box<ComparableOperation>,
        exponent: Box<ComparableOperation>,
    },
    SquareRoot(Box<ComparableOperation>),
}

impl ComparableOperation {
    fn leaf(kind: ComparableKind) -> Self {
        ComparableOperation {
            negated: false,
            inverted: false,
            kind,
        }
    }

    fn toggled_negation(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    fn toggled_inversion(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    pub fn is_summation(&self) -> bool {
        matches!(
            self.kind,
            ComparableKind::Accumulation {
                kind: AccumulationKind::Summation,
                ..
            }
        )
    }

    pub fn is_product(&self) -> bool {
        matches!(
            self.kind,
            ComparableKind::Accumulation {
                kind: AccumulationKind::Product,
                ..
            }
        )
    }

    /// Operands of an accumulation; empty for every other node.
    pub fn operands(&self) -> &[ComparableOperation] {
        match &self.kind {
            ComparableKind::Accumulation { operands, .. } => operands,
            _ => &[],
        }
    }

    fn category(&self) -> u8 {
        match &self.kind {
            ComparableKind::Accumulation {
                kind: AccumulationKind::Summation,
                ..
            } => 0,
            ComparableKind::NonCommutative(NonCommutativeOperation::Exponentiation { .. }) => 1,
            ComparableKind::NonCommutative(NonCommutativeOperation::SquareRoot(_)) => 2,
            ComparableKind::Constant(_) => 3,
            ComparableKind::Variable(_) => 4,
            ComparableKind::Accumulation {
                kind: AccumulationKind::Product,
                ..
            } => 5,
        }
    }
}

/// Total order used to sort the operands of every accumulation.
pub fn compare(a: &ComparableOperation, b: &ComparableOperation) -> Ordering {
    a.category()
        .cmp(&b.category())
        .then_with(|| compare_same_category(&a.kind, &b.kind))
        .then(a.negated.cmp(&b.negated))
        .then(a.inverted.cmp(&b.inverted))
}

fn compare_same_category(a: &ComparableKind, b: &ComparableKind) -> Ordering {
    use ComparableKind::*;
    use NonCommutativeOperation::*;

    match (a, b) {
        (Constant(x), Constant(y)) => x
            .total_cmp(y)
            .then_with(|| representation_rank(x).cmp(&representation_rank(y))),
        (Variable(x), Variable(y)) => x.cmp(y),
        (Accumulation { operands: x, .. }, Accumulation { operands: y, .. }) => {
            compare_operand_lists(x, y)
        }
        (
            NonCommutative(Exponentiation {
                base: xb,
                exponent: xe,
            }),
            NonCommutative(Exponentiation {
                base: yb,
                exponent: ye,
            }),
        ) => compare(xb, yb).then_with(|| compare(xe, ye)),
        (NonCommutative(SquareRoot(x)), NonCommutative(SquareRoot(y))) => compare(x, y),
        _ => Ordering::Equal,
    }
}

/// Leading operands first, then the rest in turn; a shorter list sorts first on a common prefix.
fn compare_operand_lists(x: &[ComparableOperation], y: &[ComparableOperation]) -> Ordering {
    for (a, b) in x.iter().zip(y) {
        let ord = compare(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    x.len().cmp(&y.len())
}

/// Orders constants of equal value by how they were written.
fn representation_rank(value: &Real) -> (u8, u64, u64, u64) {
    match value {
        Real::Integer(_) => (0, 0, 0, 0),
        Real::Rational(fraction) => (1, fraction.whole, fraction.numerator, fraction.denominator),
        Real::Irrational(_) => (2, 0, 0, 0),
    }
}

/// Converts `expr` to its canonical comparable form. Never fails.
pub fn to_comparable_operation(expr: &Expr) -> ComparableOperation {
    match expr {
        Expr::Constant(value) => ComparableOperation::leaf(ComparableKind::Constant(*value)),
        Expr::Variable(name) => ComparableOperation::leaf(ComparableKind::Variable(name.clone())),
        Expr::Add(..) | Expr::Sub(..) => {
            let mut operands = Vec::new();
            collect_summation(expr, false, &mut operands);
            accumulation(AccumulationKind::Summation, false, operands)
        }
        Expr::Mul(..) | Expr::Div(..) => {
            let mut operands = Vec::new();
            let mut negated = false;
            collect_product(expr, false, &mut operands, &mut negated);
            accumulation(AccumulationKind::Product, negated, operands)
        }
        Expr::Pow(base, exponent) => ComparableOperation::leaf(ComparableKind::NonCommutative(
            NonCommutativeOperation::Exponentiation {
                base: Box::new(to_comparable_operation(base)),
                exponent: Box::new(to_comparable_operation(exponent)),
            },
        )),
        Expr::Call(Function::SquareRoot, argument) => ComparableOperation::leaf(
            ComparableKind::NonCommutative(NonCommutativeOperation::SquareRoot(Box::new(
                to_comparable_operation(argument),
            ))),
        ),
        Expr::Neg(inner) => to_comparable_operation(inner).toggled_negation(),
        Expr::Pos(inner) | Expr::Group(inner) => to_comparable_operation(inner),
    }
}

fn accumulation(
    kind: AccumulationKind,
    negated: bool,
    mut operands: Vec<ComparableOperation>,
) -> ComparableOperation {
    operands.sort_by(compare);
    ComparableOperation {
        negated,
        inverted: false,
        kind: ComparableKind::Accumulation { kind, operands },
    }
}

/// Flattens an addition/subtraction chain. `negate` is the sign this subtree carries into the
/// parent summation.
fn collect_summation(expr: &Expr, negate: bool, operands: &mut Vec<ComparableOperation>) {
    match expr {
        Expr::Add(a, b) => {
            collect_summation(a, negate, operands);
            collect_summation(b, negate, operands);
        }
        Expr::Sub(a, b) => {
            collect_summation(a, negate, operands);
            collect_summation(b, !negate, operands);
        }
        _ => {
            let operand = to_comparable_operation(expr);
            let operand = if negate {
                operand.toggled_negation()
            } else {
                operand
            };
            absorb_summand(operand, operands);
        }
    }
}

/// A nested summation reached through groups or negations is merged, its sign distributed over
/// its own operands.
fn absorb_summand(operand: ComparableOperation, operands: &mut Vec<ComparableOperation>) {
    match operand {
        ComparableOperation {
            negated,
            inverted: false,
            kind:
                ComparableKind::Accumulation {
                    kind: AccumulationKind::Summation,
                    operands: inner,
                },
        } => operands.extend(inner.into_iter().map(|child| {
            if negated {
                child.toggled_negation()
            } else {
                child
            }
        })),
        other => operands.push(other),
    }
}

/// Flattens a multiplication/division chain. Reciprocals stay on their operands; signs are
/// folded into `negated`.
fn collect_product(
    expr: &Expr,
    invert: bool,
    operands: &mut Vec<ComparableOperation>,
    negated: &mut bool,
) {
    match expr {
        Expr::Mul(a, b) => {
            collect_product(a, invert, operands, negated);
            collect_product(b, invert, operands, negated);
        }
        Expr::Div(a, b) => {
            collect_product(a, invert, operands, negated);
            collect_product(b, !invert, operands, negated);
        }
        _ => {
            let operand = to_comparable_operation(expr);
            let operand = if invert {
                operand.toggled_inversion()
            } else {
                operand
            };
            absorb_factor(operand, operands, negated);
        }
    }
}

fn absorb_factor(
    mut operand: ComparableOperation,
    operands: &mut Vec<ComparableOperation>,
    negated: &mut bool,
) {
    *negated ^= operand.negated;
    operand.negated = false;
    match operand {
        ComparableOperation {
            inverted,
            kind:
                ComparableKind::Accumulation {
                    kind: AccumulationKind::Product,
                    operands: inner,
                },
            ..
        } => operands.extend(inner.into_iter().map(|child| {
            if inverted {
                child.toggled_inversion()
            } else {
                child
            }
        })),
        other => operands.push(other),
    }
}
