use super::lexer::*;
use crate::cmp::Strictness;
use crate::common::{vec1, Float, Int, Value};
use crate::error::DResult;
use logos_iter::LogosIter;
use crate::select::*;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

type PResult<T> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: Vec<TokenKind>,
    },
    UnexpectedString {
        expected: Vec<TokenKind>,
    },
    InvalidNumber,
    InvalidSelector(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                found: Some(found),
                expected,
            } => {
                write!(f, "unexpected token: found {}, expected ", found)?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedToken {
                found: None,
                expected,
            } => {
                write!(f, "unexpected end of input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                write!(f, "expected ")?;
                fmt_expected(expected, f)
            }
            Self::InvalidNumber => write!(f, "number is out of range"),
            Self::InvalidSelector(why) => f.write_str(why),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let len = expected.len();

    if expected.is_empty() {
        Ok(())
    } else if len == 1 {
        f.write_str(expected[0].to_str())
    } else if len == 2 {
        write!(f, "{} or {}", expected[0].to_str(), expected[1].to_str())
    } else {
        for exp in &expected[..len - 1] {
            write!(f, "{}, ", exp.to_str())?;
        }
        write!(f, "or {}", expected[len - 1].to_str())
    }
}

pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    end: usize,
}

impl<'a> Parser<'a> {
    const LITERALS: &'static [TokenKind] = &[TokenKind::Integer, TokenKind::Decimal, TokenKind::Text];

    const COMPARISONS: &'static [TokenKind] = &[
        TokenKind::LessThan,
        TokenKind::LessEqual,
        TokenKind::GreaterThan,
        TokenKind::GreaterEqual,
        TokenKind::Equal,
    ];

    const SELECTORS: &'static [TokenKind] = &[
        TokenKind::Highest,
        TokenKind::Lowest,
        TokenKind::Random,
        TokenKind::All,
        TokenKind::LessThan,
        TokenKind::LessEqual,
        TokenKind::GreaterThan,
        TokenKind::GreaterEqual,
        TokenKind::Equal,
        TokenKind::LeftBrace,
        TokenKind::Integer,
        TokenKind::Decimal,
        TokenKind::Text,
    ];

    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lexer: lexer(source),
            end: 0,
        }
    }

    /// Parses one selector, or a [`Pipeline`] when several follow each other.
    pub fn parse(mut self) -> PResult<DiceSelector> {
        let first = self.parse_selector()?;
        if self.at_end() {
            return Ok(first);
        }

        let mut selectors = vec1![first];
        while !self.at_end() {
            selectors.push(self.parse_selector()?);
        }
        Ok(Pipeline::from(selectors).into())
    }

    fn at_end(&mut self) -> bool {
        self.lexer.peek().is_none()
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let next = self.lexer.next();
        self.end = self.lexer.span().end;
        next
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected_token(vec![expected])
        }
    }

    fn consume_as<T: FromStr>(&mut self) -> PResult<T> {
        self.advance();
        let parsed = self.lexer.slice().parse::<T>();
        match parsed {
            Ok(x) => Ok(x),
            Err(_) => self.error(ParseErrorKind::InvalidNumber),
        }
    }

    fn error<T>(&mut self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_string(),
        })
    }

    fn unexpected_token<T>(&mut self, expected: Vec<TokenKind>) -> PResult<T> {
        let found = self.advance();
        if matches!(found, Some(TokenKind::Error)) {
            self.error(ParseErrorKind::UnexpectedString { expected })
        } else {
            self.error(ParseErrorKind::UnexpectedToken { found, expected })
        }
    }

    /// Turns a rejected selector configuration into an error spanning the selector.
    fn checked(&self, start: usize, built: DResult<DiceSelector>) -> PResult<DiceSelector> {
        built.map_err(|why| {
            let span = start..self.end;
            ParseError {
                kind: ParseErrorKind::InvalidSelector(why.to_string()),
                slice: self.source.get(span.clone()).unwrap_or_default().to_string(),
                span,
            }
        })
    }

    fn parse_selector(&mut self) -> PResult<DiceSelector> {
        let next = self.lexer.peek().copied();
        match next {
            Some(kind @ (TokenKind::Highest | TokenKind::Lowest | TokenKind::Random)) => {
                self.advance();
                let start = self.lexer.span().start;
                let quantity = self.parse_quantity()?;
                let built = match kind {
                    TokenKind::Highest => DiceSelector::highest(quantity),
                    TokenKind::Lowest => DiceSelector::lowest(quantity),
                    _ => Ok(DiceSelector::random(quantity)),
                };
                self.checked(start, built)
            }
            Some(TokenKind::All) => {
                self.advance();
                Ok(DiceSelector::all())
            }
            Some(TokenKind::LeftBrace) => {
                self.advance();
                let start = self.lexer.span().start;
                let strictness = self.parse_strictness();
                let values = self.parse_set()?;
                self.checked(start, InSelector::new(values, strictness).map(Into::into))
            }
            Some(op) if Self::COMPARISONS.contains(&op) => {
                self.advance();
                let start = self.lexer.span().start;
                let strictness = self.parse_strictness();
                let value = self.parse_literal()?;
                self.checked(start, Self::comparison(op, value, strictness))
            }
            Some(lit) if Self::LITERALS.contains(&lit) => {
                let value = self.parse_literal()?;
                let start = self.lexer.span().start;
                self.checked(
                    start,
                    EqualToSelector::new(value, Strictness::Loose).map(Into::into),
                )
            }
            _ => self.unexpected_token(Self::SELECTORS.to_vec()),
        }
    }

    fn comparison(op: TokenKind, value: Value, strictness: Strictness) -> DResult<DiceSelector> {
        match op {
            TokenKind::LessThan => LessThanSelector::new(value, strictness).map(Into::into),
            TokenKind::LessEqual => LessThanOrEqualToSelector::new(value, strictness).map(Into::into),
            TokenKind::GreaterThan => GreaterThanSelector::new(value, strictness).map(Into::into),
            TokenKind::GreaterEqual => {
                GreaterThanOrEqualToSelector::new(value, strictness).map(Into::into)
            }
            _ => EqualToSelector::new(value, strictness).map(Into::into),
        }
    }

    fn parse_quantity(&mut self) -> PResult<usize> {
        if self.matches(TokenKind::Integer) {
            self.consume_as()
        } else {
            Ok(1)
        }
    }

    fn parse_strictness(&mut self) -> Strictness {
        if self.matches(TokenKind::Strict) {
            self.advance();
            Strictness::Strict
        } else {
            Strictness::Loose
        }
    }

    fn parse_set(&mut self) -> PResult<Vec<Value>> {
        let mut values = Vec::new();
        while !self.matches(TokenKind::RightBrace) {
            values.push(self.parse_literal()?);
            if self.matches(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.consume(TokenKind::RightBrace)?;
        Ok(values)
    }

    fn parse_literal(&mut self) -> PResult<Value> {
        match self.lexer.peek().copied() {
            Some(TokenKind::Integer) => self.consume_as::<Int>().map(Value::Int),
            Some(TokenKind::Decimal) => self.consume_as::<Float>().map(Value::Float),
            Some(TokenKind::Text) => {
                self.advance();
                Ok(Value::Str(unquote(self.lexer.slice())))
            }
            _ => self.unexpected_token(Self::LITERALS.to_vec()),
        }
    }
}

/// Strips the quotes off a text token; a backslash keeps the character after it.
fn unquote(quoted: &str) -> String {
    let mut ret = String::with_capacity(quoted.len());
    let mut chars = quoted[1..quoted.len() - 1].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => ret.extend(chars.next()),
            c => ret.push(c),
        }
    }
    ret
}
