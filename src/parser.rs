//! Precedence-climbing parser over the token stream.
//!
//! Precedence, loosest first: `+ -`, implicit multiplication, explicit `* /`, unary `+ -`,
//! `^` (right associative), then `√` and function calls. A unary sign in front of an implicit
//! product covers the whole product, so `-2(1+2)` is `-(2(1+2))`.

use log::debug;

use crate::error::{OptionalRule, ParseError, RequiredRule};
use crate::eval::evaluate_numeric;
use crate::expr::{Equation, Expr, Function};
use crate::real::Real;
use crate::tokenizer::{tokenize, Token, TokenKind, SQUARE_ROOT_FUNCTION};

/// Deepest nesting of groups, signs, exponents and roots accepted; anything deeper fails with
/// [`RequiredRule::NestingTooDeep`]. Flat chains such as `1+1+1` do not nest.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Longest token stream accepted. Together with [`MAX_NESTING_DEPTH`] this bounds the depth of
/// every tree the recursive analyses walk.
pub const MAX_TOKENS: usize = 1000;

/// Largest exponent value strict mode accepts.
pub const MAX_EXPONENT: u32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorCheckingMode {
    /// Reject only input whose meaning is ambiguous or undefined.
    RequiredOnly,
    /// Also reject resolvable but discouraged input such as `((3))` or `--4`.
    #[default]
    AllErrors,
}

impl ErrorCheckingMode {
    pub fn includes_optional_errors(self) -> bool {
        self == ErrorCheckingMode::AllErrors
    }
}

type ParseResult<T> = std::result::Result<T, ParseError>;

pub fn parse_numeric_expression(input: &str, mode: ErrorCheckingMode) -> ParseResult<Expr> {
    parse_numeric_expression_with_limit(input, mode, MAX_NESTING_DEPTH)
}

pub fn parse_numeric_expression_with_limit(
    input: &str,
    mode: ErrorCheckingMode,
    max_depth: usize,
) -> ParseResult<Expr> {
    let tokens = tokenize(input, &[]);
    Parser::new(input, tokens, Context::Numeric, mode, max_depth)
        .parse_expression_grammar()
        .inspect_err(|error| debug!("failed to parse numeric expression {input:?}: {error}"))
}

pub fn parse_algebraic_expression(
    input: &str,
    allowed_variables: &[&str],
    mode: ErrorCheckingMode,
) -> ParseResult<Expr> {
    parse_algebraic_expression_with_limit(input, allowed_variables, mode, MAX_NESTING_DEPTH)
}

pub fn parse_algebraic_expression_with_limit(
    input: &str,
    allowed_variables: &[&str],
    mode: ErrorCheckingMode,
    max_depth: usize,
) -> ParseResult<Expr> {
    let tokens = tokenize(input, allowed_variables);
    let context = Context::Algebraic(allowed_variables);
    Parser::new(input, tokens, context, mode, max_depth)
        .parse_expression_grammar()
        .inspect_err(|error| debug!("failed to parse algebraic expression {input:?}: {error}"))
}

/// Parses `lhs = rhs` with exactly one equals sign and a non-empty expression on each side.
pub fn parse_algebraic_equation(
    input: &str,
    allowed_variables: &[&str],
    mode: ErrorCheckingMode,
) -> ParseResult<Equation> {
    let tokens = tokenize(input, allowed_variables);
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let equals: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.kind == TokenKind::Equals)
        .map(|(index, _)| index)
        .collect();
    let split = match equals.as_slice() {
        [] => return Err(RequiredRule::EquationMissingEquals.into()),
        [index] => *index,
        _ => return Err(RequiredRule::EquationHasTooManyEquals.into()),
    };
    let rhs_tokens = tokens[split + 1..].to_vec();
    let lhs_tokens = tokens[..split].to_vec();
    if lhs_tokens.is_empty() || rhs_tokens.is_empty() {
        return Err(RequiredRule::EquationMissingSide.into());
    }

    let context = Context::Algebraic(allowed_variables);
    let side = |tokens| {
        Parser::new(input, tokens, context, mode, MAX_NESTING_DEPTH).parse_expression_grammar()
    };
    let equation = Equation {
        lhs: side(lhs_tokens)?,
        rhs: side(rhs_tokens)?,
    };
    Ok(equation)
}

#[derive(Clone, Copy)]
enum Context<'v> {
    Numeric,
    Algebraic(&'v [&'v str]),
}

impl Context<'_> {
    fn allows_variable(&self, name: &str) -> bool {
        match self {
            Context::Numeric => false,
            Context::Algebraic(allowed) => allowed.contains(&name),
        }
    }

    fn is_algebraic(&self) -> bool {
        matches!(self, Context::Algebraic(_))
    }
}

struct Parser<'s, 'v> {
    source: &'s str,
    tokens: Vec<Token>,
    position: usize,
    context: Context<'v>,
    mode: ErrorCheckingMode,
    depth: usize,
    max_depth: usize,
}

impl<'s, 'v> Parser<'s, 'v> {
    fn new(
        source: &'s str,
        tokens: Vec<Token>,
        context: Context<'v>,
        mode: ErrorCheckingMode,
        max_depth: usize,
    ) -> Self {
        Parser {
            source,
            tokens,
            position: 0,
            context,
            mode,
            depth: 0,
            max_depth,
        }
    }

    fn parse_expression_grammar(mut self) -> ParseResult<Expr> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        if self.tokens.len() > MAX_TOKENS {
            return Err(RequiredRule::ExpressionTooLong.into());
        }
        let expr = self.parse_expression()?;
        self.ensure_no_remaining_tokens()?;
        if self.mode.includes_optional_errors() {
            check_optional_errors(&expr)?;
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.position).map(|token| &token.kind)
    }

    fn previous(&self) -> Option<&TokenKind> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| &token.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        let text = self.source.get(token.start..token.end).unwrap_or_default();
        ParseError::UnexpectedToken {
            token: text.to_string(),
            offset: token.start,
        }
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(RequiredRule::NestingTooDeep.into());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn ensure_no_remaining_tokens(&self) -> ParseResult<()> {
        match self.tokens.get(self.position) {
            None => Ok(()),
            Some(token) => Err(match token.kind {
                TokenKind::LeftParen | TokenKind::RightParen => {
                    RequiredRule::UnbalancedParentheses.into()
                }
                _ => self.unexpected(token),
            }),
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_implicit_chain()?;
        loop {
            let build = match self.peek() {
                Some(TokenKind::Plus) => Expr::Add,
                Some(TokenKind::Minus) => Expr::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_implicit_chain()?;
            lhs = build(lhs.boxed(), rhs.boxed());
        }
        Ok(lhs)
    }

    fn parse_implicit_chain(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_mul_div()?;
        while self.starts_implicit_operand() {
            let rhs = self.parse_implicit_rhs()?;
            lhs = Expr::Mul(lhs.boxed(), rhs.boxed());
        }
        self.reject_adjacent_number()?;
        Ok(lhs)
    }

    fn parse_implicit_rhs(&mut self) -> ParseResult<Expr> {
        let mut rhs = self.parse_implicit_factor()?;
        loop {
            let build = match self.peek() {
                Some(TokenKind::Multiply) => Expr::Mul,
                Some(TokenKind::Divide) => Expr::Div,
                _ => break,
            };
            self.advance();
            let operand = self.parse_unary()?;
            rhs = build(rhs.boxed(), operand.boxed());
        }
        Ok(rhs)
    }

    fn parse_mul_div(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let build = match self.peek() {
                Some(TokenKind::Multiply) => Expr::Mul,
                Some(TokenKind::Divide) => Expr::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = build(lhs.boxed(), rhs.boxed());
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some(TokenKind::Plus | TokenKind::Minus) => self.parse_signed_operand(),
            _ => self.parse_power(),
        }
    }

    /// A signed operand covers the implicit product that follows the sign.
    fn parse_signed_operand(&mut self) -> ParseResult<Expr> {
        let build = match self.peek() {
            Some(TokenKind::Plus) => Some(Expr::Pos as fn(Box<Expr>) -> Expr),
            Some(TokenKind::Minus) => Some(Expr::Neg as fn(Box<Expr>) -> Expr),
            _ => None,
        };
        if let Some(build) = build {
            self.advance();
            let operand = self.nested(Self::parse_signed_operand)?;
            return Ok(build(operand.boxed()));
        }

        let mut operand = self.parse_power()?;
        while self.starts_implicit_operand() {
            let factor = self.parse_implicit_factor()?;
            operand = Expr::Mul(operand.boxed(), factor.boxed());
        }
        self.reject_adjacent_number()?;
        Ok(operand)
    }

    fn parse_power(&mut self) -> ParseResult<Expr> {
        let base = self.parse_root_or_primary()?;
        if self.peek() == Some(&TokenKind::Exponent) {
            self.advance();
            let exponent = self.nested(Self::parse_exponent)?;
            return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
        }
        Ok(base)
    }

    fn parse_exponent(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some(TokenKind::Plus) => {
                self.advance();
                Ok(Expr::Pos(self.nested(Self::parse_exponent)?.boxed()))
            }
            Some(TokenKind::Minus) => {
                self.advance();
                Ok(Expr::Neg(self.nested(Self::parse_exponent)?.boxed()))
            }
            _ => self.parse_power(),
        }
    }

    fn parse_root_or_primary(&mut self) -> ParseResult<Expr> {
        if self.peek() != Some(&TokenKind::SquareRoot) {
            return self.parse_primary();
        }
        self.advance();
        if self.peek().is_none() {
            return Err(RequiredRule::HangingSquareRoot.into());
        }
        let argument = self.nested(Self::parse_root_operand)?;
        Ok(Expr::Call(Function::SquareRoot, argument.boxed()))
    }

    fn parse_root_operand(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some(TokenKind::Plus) => {
                self.advance();
                Ok(Expr::Pos(self.nested(Self::parse_root_operand)?.boxed()))
            }
            Some(TokenKind::Minus) => {
                self.advance();
                Ok(Expr::Neg(self.nested(Self::parse_root_operand)?.boxed()))
            }
            _ => self.parse_root_or_primary(),
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.tokens.get(self.position).cloned() else {
            return Err(RequiredRule::MissingOperand.into());
        };
        match &token.kind {
            TokenKind::PositiveInteger(value) => {
                self.advance();
                Ok(Expr::Constant(Real::Integer(*value)))
            }
            TokenKind::PositiveReal(value) => {
                self.advance();
                Ok(Expr::Constant(Real::Irrational(*value)))
            }
            TokenKind::IntegerTooLarge => Err(RequiredRule::NumberTooLarge.into()),
            TokenKind::Variable(_) | TokenKind::InvalidIdentifier(_) => self.parse_variable(),
            TokenKind::LeftParen => self.parse_group(),
            TokenKind::FunctionName(_) => self.parse_function(),
            TokenKind::RightParen => Err(RequiredRule::MissingOperand.into()),
            TokenKind::Multiply | TokenKind::Divide | TokenKind::Exponent => {
                match self.previous() {
                    Some(previous) if previous.is_binary_operator() => {
                        Err(RequiredRule::SubsequentBinaryOperators.into())
                    }
                    _ => Err(RequiredRule::MissingOperand.into()),
                }
            }
            _ => Err(self.unexpected(&token)),
        }
    }

    fn parse_implicit_factor(&mut self) -> ParseResult<Expr> {
        let factor = match self.peek() {
            Some(TokenKind::SquareRoot) => self.parse_root_or_primary()?,
            _ => self.parse_primary()?,
        };
        if self.peek() != Some(&TokenKind::Exponent) {
            return Ok(factor);
        }
        if !self.context.is_algebraic() {
            return Err(RequiredRule::ExponentOnImplicitOperand.into());
        }
        self.advance();
        let exponent = self.nested(Self::parse_exponent)?;
        Ok(Expr::Pow(factor.boxed(), exponent.boxed()))
    }

    fn starts_implicit_operand(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                TokenKind::LeftParen
                    | TokenKind::SquareRoot
                    | TokenKind::FunctionName(_)
                    | TokenKind::Variable(_)
                    | TokenKind::InvalidIdentifier(_)
            )
        )
    }

    /// A bare number can never continue a product without an operator.
    fn reject_adjacent_number(&self) -> ParseResult<()> {
        if !self.peek().is_some_and(TokenKind::is_number) {
            return Ok(());
        }
        let rule = match self.previous() {
            Some(previous) if previous.is_number() => RequiredRule::SpacesBetweenNumbers,
            Some(TokenKind::Variable(_)) => RequiredRule::NumberAfterVariable,
            _ => RequiredRule::NumberAfterOperand,
        };
        Err(rule.into())
    }

    fn parse_variable(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.advance() else {
            return Err(RequiredRule::MissingOperand.into());
        };
        match &token.kind {
            TokenKind::Variable(name) if self.context.allows_variable(name) => {
                Ok(Expr::Variable(name.clone()))
            }
            TokenKind::Variable(_) | TokenKind::InvalidIdentifier(_) => {
                Err(ParseError::DisallowedVariable {
                    names: self.disallowed_names(),
                })
            }
            _ => Err(self.unexpected(&token)),
        }
    }

    /// Disallowed names across the whole input, each once. Unresolved letter runs count letter
    /// by letter, so `apple` reports `a, p, l, e`.
    fn disallowed_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut record = |name: String| {
            if !names.contains(&name) {
                names.push(name);
            }
        };
        for token in &self.tokens {
            match &token.kind {
                TokenKind::Variable(name) if !self.context.allows_variable(name) => {
                    record(name.clone());
                }
                TokenKind::InvalidIdentifier(run) => {
                    run.chars().map(String::from).for_each(&mut record);
                }
                _ => {}
            }
        }
        names
    }

    fn parse_group(&mut self) -> ParseResult<Expr> {
        self.advance();
        if self.peek().is_none() {
            return Err(RequiredRule::UnbalancedParentheses.into());
        }
        let inner = self.nested(Self::parse_expression)?;
        self.expect_closing_paren()?;
        Ok(Expr::Group(inner.boxed()))
    }

    fn parse_function(&mut self) -> ParseResult<Expr> {
        let Some(Token {
            kind: TokenKind::FunctionName(name),
            ..
        }) = self.advance()
        else {
            return Err(RequiredRule::MissingOperand.into());
        };
        if name != SQUARE_ROOT_FUNCTION {
            return Err(ParseError::UnknownFunction { name });
        }
        if self.peek() != Some(&TokenKind::LeftParen) {
            return Err(RequiredRule::FunctionCallWithoutParentheses.into());
        }
        self.advance();
        let argument = self.nested(Self::parse_expression)?;
        self.expect_closing_paren()?;
        Ok(Expr::Call(Function::SquareRoot, argument.boxed()))
    }

    fn expect_closing_paren(&mut self) -> ParseResult<()> {
        match self.tokens.get(self.position) {
            Some(Token {
                kind: TokenKind::RightParen,
                ..
            }) => {
                self.position += 1;
                Ok(())
            }
            None => Err(RequiredRule::UnbalancedParentheses.into()),
            Some(token) => Err(self.unexpected(token)),
        }
    }
}

/// Strict-mode checks, in priority order.
fn check_optional_errors(expr: &Expr) -> ParseResult<()> {
    if find_first(expr, &|node| {
        matches!(node, Expr::Group(inner) if matches!(**inner, Expr::Group(_)))
    }) {
        return Err(OptionalRule::MultipleRedundantParentheses.into());
    }
    if matches!(expr, Expr::Group(_)) {
        return Err(OptionalRule::SingleRedundantParentheses.into());
    }
    if find_first(expr, &|node| {
        matches!(node, Expr::Group(inner) if matches!(**inner, Expr::Constant(_) | Expr::Variable(_)))
    }) {
        return Err(OptionalRule::RedundantParenthesesForIndividualTerms.into());
    }
    if find_first(expr, &|node| match node {
        Expr::Neg(inner) | Expr::Pos(inner) => matches!(**inner, Expr::Neg(_) | Expr::Pos(_)),
        _ => false,
    }) {
        return Err(OptionalRule::SubsequentUnaryOperators.into());
    }
    if find_first(expr, &|node| matches!(node, Expr::Pow(_, exponent) if !exponent.is_numeric())) {
        return Err(OptionalRule::ExponentIsVariableExpression.into());
    }
    if find_first(expr, &|node| match node {
        Expr::Pow(_, exponent) => is_bare_power(exponent),
        _ => false,
    }) {
        return Err(OptionalRule::NestedExponents.into());
    }
    if find_first(expr, &|node| matches!(node, Expr::Pow(_, exponent) if is_too_large(exponent))) {
        return Err(OptionalRule::ExponentTooLarge.into());
    }
    if find_first(expr, &|node| matches!(node, Expr::Div(_, divisor) if is_zero_divisor(divisor))) {
        return Err(OptionalRule::TermDividedByZero.into());
    }
    Ok(())
}

fn is_too_large(exponent: &Expr) -> bool {
    exponent.is_numeric()
        && evaluate_numeric(exponent).is_ok_and(|value| value.to_f64() > f64::from(MAX_EXPONENT))
}

/// A variable-free divisor that evaluates to zero, float `0.0` included.
fn is_zero_divisor(divisor: &Expr) -> bool {
    divisor.is_numeric() && evaluate_numeric(divisor).is_ok_and(|value| value.is_zero())
}

fn is_bare_power(expr: &Expr) -> bool {
    match expr {
        Expr::Pow(_, _) => true,
        Expr::Neg(inner) | Expr::Pos(inner) => is_bare_power(inner),
        _ => false,
    }
}

fn find_first(expr: &Expr, matches: &dyn Fn(&Expr) -> bool) -> bool {
    if matches(expr) {
        return true;
    }
    match expr {
        Expr::Constant(_) | Expr::Variable(_) => false,
        Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
            find_first(a, matches) || find_first(b, matches)
        }
        Expr::Neg(a) | Expr::Pos(a) | Expr::Group(a) | Expr::Call(_, a) => find_first(a, matches),
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;
    use crate::expr::{add, div, pow, sub};

    #[test]
    fn zero_divisors_include_float_zero_and_cancelling_sums() {
        assert!(is_zero_divisor(&Expr::integer(0)));
        assert!(is_zero_divisor(&Expr::Constant(Real::Irrational(0.0))));
        assert!(is_zero_divisor(&sub(Expr::integer(2), Expr::integer(2))));
        assert!(!is_zero_divisor(&Expr::integer(3)));
        assert!(!is_zero_divisor(&Expr::var("x")));
        assert!(!is_zero_divisor(&div(Expr::integer(1), Expr::integer(0))));
    }

    #[test]
    fn exponent_size_is_measured_by_value() {
        assert!(!is_too_large(&Expr::integer(MAX_EXPONENT.into())));
        assert!(is_too_large(&add(Expr::integer(3), Expr::integer(3))));
        assert!(is_too_large(&pow(Expr::integer(3), Expr::integer(2))));
        assert!(!is_too_large(&Expr::var("x")));
    }
}
