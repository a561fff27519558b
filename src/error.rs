use thiserror::Error;

pub type Result<T> = std::result::Result<T, MathError>;

/// Failure of the string-level API: either the text did not parse or the tree did not evaluate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,
    #[error("unexpected token `{token}` at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    /// Every disallowed variable in the input, in order of first appearance.
    #[error("variables not allowed here: {}", .names.join(", "))]
    DisallowedVariable { names: Vec<String> },
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },
    #[error("{0}")]
    RequiredRuleViolation(RequiredRule),
    #[error("{0} (strict mode)")]
    OptionalRuleViolation(OptionalRule),
}

impl ParseError {
    pub fn is_optional(&self) -> bool {
        matches!(self, ParseError::OptionalRuleViolation(_))
    }
}

impl From<RequiredRule> for ParseError {
    fn from(rule: RequiredRule) -> Self {
        ParseError::RequiredRuleViolation(rule)
    }
}

impl From<OptionalRule> for ParseError {
    fn from(rule: OptionalRule) -> Self {
        ParseError::OptionalRuleViolation(rule)
    }
}

/// Constructs rejected in every error-checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RequiredRule {
    #[error("two numbers are separated only by spaces")]
    SpacesBetweenNumbers,
    #[error("a number follows a variable")]
    NumberAfterVariable,
    #[error("a bare number cannot be the right side of an implicit product")]
    NumberAfterOperand,
    #[error("an exponent cannot follow an implicitly multiplied term")]
    ExponentOnImplicitOperand,
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("square root has no operand")]
    HangingSquareRoot,
    #[error("an operator is missing an operand")]
    MissingOperand,
    #[error("two binary operators appear in a row")]
    SubsequentBinaryOperators,
    #[error("function name must be followed by parentheses")]
    FunctionCallWithoutParentheses,
    #[error("number is too large")]
    NumberTooLarge,
    #[error("expression is nested too deeply")]
    NestingTooDeep,
    #[error("expression is too long")]
    ExpressionTooLong,
    #[error("equation has no `=`")]
    EquationMissingEquals,
    #[error("equation has more than one `=`")]
    EquationHasTooManyEquals,
    #[error("equation side is empty")]
    EquationMissingSide,
}

/// Stylistically discouraged constructs, rejected only under [`ErrorCheckingMode::AllErrors`].
///
/// [`ErrorCheckingMode::AllErrors`]: crate::parser::ErrorCheckingMode::AllErrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum OptionalRule {
    #[error("parentheses are nested redundantly")]
    MultipleRedundantParentheses,
    #[error("the whole expression is wrapped in parentheses")]
    SingleRedundantParentheses,
    #[error("a single term is wrapped in parentheses")]
    RedundantParenthesesForIndividualTerms,
    #[error("unary operators are repeated")]
    SubsequentUnaryOperators,
    #[error("an exponent contains a variable")]
    ExponentIsVariableExpression,
    #[error("chained exponents need parentheses")]
    NestedExponents,
    #[error("exponent is too large")]
    ExponentTooLarge,
    #[error("a term is divided by zero")]
    TermDividedByZero,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is undefined over the reals")]
    Undefined,
    #[error("no value bound for variable `{0}`")]
    UnboundVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FractionParseError {
    #[error("empty fraction")]
    Empty,
    #[error("malformed fraction `{0}`")]
    Malformed(String),
    #[error("fraction has a zero denominator")]
    ZeroDenominator,
}
