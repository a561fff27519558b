//! Expression tree definitions and helpers.

use std::collections::BTreeSet;
use std::fmt;

use crate::fraction::Fraction;
use crate::real::Real;

/// A parsed expression. Groups are kept so that redundant parentheses remain visible to the
/// strict-mode checks and to rendering.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Constant(Real),
    Variable(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    /// Unary plus.
    Pos(Box<Expr>),
    Group(Box<Expr>),
    Call(Function, Box<Expr>),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Function {
    SquareRoot,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::SquareRoot => "sqrt",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn integer(value: i64) -> Self {
        Expr::Constant(Real::Integer(value))
    }

    pub fn fraction(numerator: i64, denominator: i64) -> Self {
        Expr::Constant(Real::Rational(Fraction::of(numerator, denominator)))
    }

    pub fn boxed(self) -> Box<Expr> {
        Box::new(self)
    }

    pub fn as_constant(&self) -> Option<&Real> {
        if let Expr::Constant(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_variable(&self) -> Option<&str> {
        if let Expr::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    /// Strips any number of enclosing groups.
    pub fn ungrouped(&self) -> &Expr {
        match self {
            Expr::Group(inner) => inner.ungrouped(),
            other => other,
        }
    }

    /// Distinct variable names, sorted.
    pub fn variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, names: &mut BTreeSet<String>) {
            match expr {
                Expr::Variable(name) => {
                    names.insert(name.clone());
                }
                Expr::Constant(_) => {}
                Expr::Add(a, b)
                | Expr::Sub(a, b)
                | Expr::Mul(a, b)
                | Expr::Div(a, b)
                | Expr::Pow(a, b) => {
                    collect(a, names);
                    collect(b, names);
                }
                Expr::Neg(a) | Expr::Pos(a) | Expr::Group(a) | Expr::Call(_, a) => {
                    collect(a, names)
                }
            }
        }

        let mut names = BTreeSet::new();
        collect(self, &mut names);
        names.into_iter().collect()
    }

    pub fn is_numeric(&self) -> bool {
        self.variables().is_empty()
    }
}

pub fn constant(value: impl Into<Real>) -> Expr {
    Expr::Constant(value.into())
}

pub fn variable(name: impl Into<String>) -> Expr {
    Expr::var(name)
}

pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(a.boxed(), b.boxed())
}

pub fn sub(a: Expr, b: Expr) -> Expr {
    Expr::Sub(a.boxed(), b.boxed())
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(a.boxed(), b.boxed())
}

pub fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(a.boxed(), b.boxed())
}

pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::Pow(base.boxed(), exp.boxed())
}

pub fn neg(a: Expr) -> Expr {
    Expr::Neg(a.boxed())
}

pub fn pos(a: Expr) -> Expr {
    Expr::Pos(a.boxed())
}

pub fn group(a: Expr) -> Expr {
    Expr::Group(a.boxed())
}

pub fn sqrt(a: Expr) -> Expr {
    Expr::Call(Function::SquareRoot, a.boxed())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(self))
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
