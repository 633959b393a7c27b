//! The one place values are compared.
//!
//! Every selector that looks at die values goes through [`equals`] or
//! [`compare`], so coercion and type-mismatch rules are the same everywhere.
//!
//! In [`Strictness::Loose`] mode a string that reads as a decimal number
//! (surrounding whitespace allowed, optional sign and exponent) is compared as
//! that number:
//!
//! | left \ right   | number  | numeric string | other string  |
//! |----------------|---------|----------------|---------------|
//! | number         | numeric | numeric        | mismatch      |
//! | numeric string | numeric | numeric        | lexicographic |
//! | other string   | mismatch| lexicographic  | lexicographic |
//!
//! A mismatch makes [`equals`] false and [`compare`] fail. In
//! [`Strictness::Strict`] mode nothing is coerced: equality also requires the
//! same type (`4 != 4.0`), ints and floats still order against each other, and
//! strings only order against strings.

use crate::common::{Float, Int, Value};
use crate::error::{DResult, DiceError};
use std::cmp::Ordering;

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Strictness {
    #[default]
    Loose,
    Strict,
}

impl Strictness {
    pub const fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Loose
        }
    }

    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Number {
    Int(Int),
    Float(Float),
}

impl Number {
    fn partial_cmp(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(x), Self::Int(y)) => Some(x.cmp(&y)),
            (x, y) => x.as_float().partial_cmp(&y.as_float()),
        }
    }

    fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
        }
    }
}

enum Pairing<'a> {
    Numbers(Number, Number),
    Texts(&'a str, &'a str),
    Mismatch,
}

fn parse_numeric(s: &str) -> Option<Number> {
    let s = s.trim_matches(|c: char| c.is_ascii_whitespace());
    let looks_numeric = !s.is_empty()
        && s.bytes().any(|b| b.is_ascii_digit())
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !looks_numeric {
        return None;
    }
    if let Ok(x) = s.parse::<Int>() {
        return Some(Number::Int(x));
    }
    s.parse::<Float>()
        .ok()
        .filter(|x| x.is_finite())
        .map(Number::Float)
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Int(x) => Some(Number::Int(*x)),
        Value::Float(x) => Some(Number::Float(*x)),
        Value::Str(s) => parse_numeric(s),
    }
}

fn pair<'a>(left: &'a Value, right: &'a Value, strictness: Strictness) -> Pairing<'a> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => {
            if !strictness.is_strict() {
                if let (Some(x), Some(y)) = (parse_numeric(a), parse_numeric(b)) {
                    return Pairing::Numbers(x, y);
                }
            }
            Pairing::Texts(a, b)
        }
        (Value::Str(_), _) | (_, Value::Str(_)) if strictness.is_strict() => Pairing::Mismatch,
        _ => match (as_number(left), as_number(right)) {
            (Some(x), Some(y)) => Pairing::Numbers(x, y),
            _ => Pairing::Mismatch,
        },
    }
}

/// Whether `left` equals `right`. Never fails: incomparable values are unequal.
pub fn equals(left: &Value, right: &Value, strictness: Strictness) -> bool {
    if strictness.is_strict() && std::mem::discriminant(left) != std::mem::discriminant(right) {
        return false;
    }
    match pair(left, right, strictness) {
        Pairing::Numbers(x, y) => x.partial_cmp(y) == Some(Ordering::Equal),
        Pairing::Texts(a, b) => a == b,
        Pairing::Mismatch => false,
    }
}

/// Orders `left` against `right`, failing with [`DiceError::TypeMismatch`]
/// when the two have no common order.
pub fn compare(left: &Value, right: &Value, strictness: Strictness) -> DResult<Ordering> {
    match pair(left, right, strictness) {
        Pairing::Numbers(x, y) => x
            .partial_cmp(y)
            .ok_or_else(|| DiceError::type_mismatch(left, right)),
        Pairing::Texts(a, b) => Ok(a.cmp(b)),
        Pairing::Mismatch => Err(DiceError::type_mismatch(left, right)),
    }
}

/// Checks that `values` can be ranked against each other in loose mode,
/// i.e. they are all numeric (numbers or numeric strings) or all non-numeric
/// strings. Mixing the two would make the loose order intransitive.
pub(crate) fn ensure_rankable<'a>(values: impl IntoIterator<Item = &'a Value>) -> DResult<()> {
    let mut first_number = None;
    let mut first_text = None;
    for value in values {
        if value.is_nan() {
            return Err(DiceError::type_mismatch(value, value));
        }
        let slot = if as_number(value).is_some() {
            &mut first_number
        } else {
            &mut first_text
        };
        slot.get_or_insert(value);
        if let (Some(n), Some(t)) = (first_number, first_text) {
            return Err(DiceError::type_mismatch(n, t));
        }
    }
    Ok(())
}
