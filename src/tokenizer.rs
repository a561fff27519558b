//! Source text to positioned tokens.
//!
//! Runs of letters are split into allowed variable names, so `2xy` with `x` and `y` allowed
//! yields a number and two variables. Letters that cannot be resolved become either a function
//! name (when followed by `(`) or an invalid identifier; the parser decides what error that is.

use nom::branch::alt;
use nom::character::complete::{alpha1, char, digit1, one_of};
use nom::combinator::{map, opt, recognize, value};
use nom::error::VerboseError;
use nom::sequence::pair;
use nom::IResult;

pub const SQUARE_ROOT_FUNCTION: &str = "sqrt";

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    PositiveInteger(i64),
    PositiveReal(f64),
    IntegerTooLarge,
    Variable(String),
    FunctionName(String),
    InvalidIdentifier(String),
    Plus,
    Minus,
    Multiply,
    Divide,
    Exponent,
    SquareRoot,
    LeftParen,
    RightParen,
    Equals,
    Invalid(char),
}

impl TokenKind {
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            TokenKind::PositiveInteger(_) | TokenKind::PositiveReal(_) | TokenKind::IntegerTooLarge
        )
    }

    pub fn is_binary_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Multiply
                | TokenKind::Divide
                | TokenKind::Exponent
        )
    }
}

/// A token and its byte span in the source text.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

pub fn tokenize(input: &str, allowed_variables: &[&str]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let start = input.len() - rest.len();
        if let Ok((next, word)) = alpha1::<&str, VerboseError<&str>>(rest) {
            let followed_by_paren = next.trim_start().starts_with('(');
            tokens.extend(split_letters(word, start, allowed_variables, followed_by_paren));
            rest = next.trim_start();
            continue;
        }
        let (next, kind) = match alt((number, symbol))(rest) {
            Ok(parsed) => parsed,
            Err(_) => {
                // `rest` is non-empty, so there is always a next character.
                let invalid = rest.chars().next().unwrap_or('\u{FFFD}');
                (&rest[invalid.len_utf8()..], TokenKind::Invalid(invalid))
            }
        };
        tokens.push(Token {
            kind,
            start,
            end: input.len() - next.len(),
        });
        rest = next.trim_start();
    }
    tokens
}

fn number(input: &str) -> IResult<&str, TokenKind, VerboseError<&str>> {
    map(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |text: &str| {
            if text.contains('.') {
                text.parse::<f64>()
                    .map_or(TokenKind::IntegerTooLarge, TokenKind::PositiveReal)
            } else {
                text.parse::<i64>()
                    .map_or(TokenKind::IntegerTooLarge, TokenKind::PositiveInteger)
            }
        },
    )(input)
}

fn symbol(input: &str) -> IResult<&str, TokenKind, VerboseError<&str>> {
    alt((
        value(TokenKind::Plus, char('+')),
        value(TokenKind::Minus, one_of("-\u{2212}")),
        value(TokenKind::Multiply, one_of("*×")),
        value(TokenKind::Divide, one_of("/÷")),
        value(TokenKind::Exponent, char('^')),
        value(TokenKind::SquareRoot, char('√')),
        value(TokenKind::LeftParen, char('(')),
        value(TokenKind::RightParen, char(')')),
        value(TokenKind::Equals, char('=')),
    ))(input)
}

/// Splits a run of letters starting at byte `start` into identifier tokens.
///
/// An exact allowed name wins outright. Otherwise names are peeled from the front: `sqrt`, then
/// the longest allowed name, then nothing. Whatever cannot be peeled is kept as one token.
fn split_letters(word: &str, start: usize, allowed: &[&str], followed_by_paren: bool) -> Vec<Token> {
    let token = |kind, from: usize, to: usize| Token {
        kind,
        start: start + from,
        end: start + to,
    };
    if allowed.contains(&word) {
        return vec![token(TokenKind::Variable(word.to_string()), 0, word.len())];
    }

    let mut tokens = Vec::new();
    let mut offset = 0;
    while offset < word.len() {
        let rest = &word[offset..];
        if rest.starts_with(SQUARE_ROOT_FUNCTION) {
            let end = offset + SQUARE_ROOT_FUNCTION.len();
            tokens.push(token(
                TokenKind::FunctionName(SQUARE_ROOT_FUNCTION.to_string()),
                offset,
                end,
            ));
            offset = end;
            continue;
        }
        let longest = allowed
            .iter()
            .filter(|name| !name.is_empty() && rest.starts_with(**name))
            .max_by_key(|name| name.len());
        match longest {
            Some(name) => {
                tokens.push(token(TokenKind::Variable(name.to_string()), offset, offset + name.len()));
                offset += name.len();
            }
            None => {
                let kind = if followed_by_paren {
                    TokenKind::FunctionName(rest.to_string())
                } else {
                    TokenKind::InvalidIdentifier(rest.to_string())
                };
                tokens.push(token(kind, offset, word.len()));
                offset = word.len();
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tokenizer_tests {
    use super::*;

    fn kinds(input: &str, allowed: &[&str]) -> Vec<TokenKind> {
        tokenize(input, allowed).into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn splits_letter_runs_into_allowed_variables() {
        assert_eq!(
            kinds("2xy", &["x", "y"]),
            vec![
                TokenKind::PositiveInteger(2),
                TokenKind::Variable("x".into()),
                TokenKind::Variable("y".into()),
            ]
        );
    }

    #[test]
    fn prefers_longest_allowed_name() {
        assert_eq!(
            kinds("abc", &["a", "ab", "c"]),
            vec![TokenKind::Variable("ab".into()), TokenKind::Variable("c".into())]
        );
    }

    #[test]
    fn unresolved_letters_before_paren_are_function_names() {
        assert_eq!(
            kinds("sin(2)", &[]),
            vec![
                TokenKind::FunctionName("sin".into()),
                TokenKind::LeftParen,
                TokenKind::PositiveInteger(2),
                TokenKind::RightParen,
            ]
        );
        assert_eq!(kinds("z", &["x"]), vec![TokenKind::InvalidIdentifier("z".into())]);
    }

    #[test]
    fn alternate_glyphs_and_spans() {
        let tokens = tokenize("3 × 4÷√2 − 1", &[]);
        let kinds: Vec<_> = tokens.iter().map(|token| token.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::PositiveInteger(3),
                TokenKind::Multiply,
                TokenKind::PositiveInteger(4),
                TokenKind::Divide,
                TokenKind::SquareRoot,
                TokenKind::PositiveInteger(2),
                TokenKind::Minus,
                TokenKind::PositiveInteger(1),
            ]
        );
        assert_eq!((tokens[1].start, tokens[1].end), (2, 2 + '×'.len_utf8()));
    }

    #[test]
    fn oversized_integers_and_decimals() {
        assert_eq!(
            kinds("99999999999999999999 2.5", &[]),
            vec![TokenKind::IntegerTooLarge, TokenKind::PositiveReal(2.5)]
        );
    }
}
