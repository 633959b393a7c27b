//! Rules that pick dice out of a [`DieCollection`].
//!
//! Every selector is immutable once built and returns a new collection whose
//! dice keep the order they had in the input.

mod extremal;
mod structural;
mod threshold;

pub use extremal::{HighestSelector, LowestSelector};
pub use structural::{AllSelector, Pipeline, RandomSelector, TheseSelector};
pub use threshold::{
    EqualToSelector, GreaterThanOrEqualToSelector, GreaterThanSelector, InSelector,
    LessThanOrEqualToSelector, LessThanSelector,
};

use crate::cmp::Strictness;
use crate::collection::DieCollection;
use crate::common::Value;
use crate::dice::Die;
use crate::error::{DResult, DiceError};
use crate::roll::{default_roller, Roller};
use std::fmt::{self, Write as _};

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch::enum_dispatch(Select)]
pub enum DiceSelector {
    Highest(HighestSelector),
    Lowest(LowestSelector),
    EqualTo(EqualToSelector),
    LessThan(LessThanSelector),
    LessThanOrEqualTo(LessThanOrEqualToSelector),
    GreaterThan(GreaterThanSelector),
    GreaterThanOrEqualTo(GreaterThanOrEqualToSelector),
    In(InSelector),
    Random(RandomSelector),
    All(AllSelector),
    These(TheseSelector),
    Pipeline(Pipeline),
}

#[enum_dispatch::enum_dispatch]
pub trait Select {
    /// Selects from `dice`, drawing any randomness from `roller`.
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        roller: &mut R,
    ) -> DResult<DieCollection<'a>>;

    fn select<'a>(&self, dice: &DieCollection<'a>) -> DResult<DieCollection<'a>> {
        self.select_with(dice, &mut default_roller())
    }
}

impl DiceSelector {
    pub fn highest(quantity: usize) -> DResult<Self> {
        HighestSelector::new(quantity).map(Self::from)
    }

    pub fn lowest(quantity: usize) -> DResult<Self> {
        LowestSelector::new(quantity).map(Self::from)
    }

    pub fn equal_to(value: impl Into<Value>, strict: bool) -> DResult<Self> {
        EqualToSelector::new(value, Strictness::from_strict(strict)).map(Self::from)
    }

    pub fn less_than(threshold: impl Into<Value>) -> DResult<Self> {
        LessThanSelector::new(threshold, Strictness::Loose).map(Self::from)
    }

    pub fn less_than_or_equal_to(threshold: impl Into<Value>) -> DResult<Self> {
        LessThanOrEqualToSelector::new(threshold, Strictness::Loose).map(Self::from)
    }

    pub fn greater_than(threshold: impl Into<Value>) -> DResult<Self> {
        GreaterThanSelector::new(threshold, Strictness::Loose).map(Self::from)
    }

    pub fn greater_than_or_equal_to(threshold: impl Into<Value>) -> DResult<Self> {
        GreaterThanOrEqualToSelector::new(threshold, Strictness::Loose).map(Self::from)
    }

    pub fn in_set<V: Into<Value>>(
        values: impl IntoIterator<Item = V>,
        strict: bool,
    ) -> DResult<Self> {
        InSelector::new(values, Strictness::from_strict(strict)).map(Self::from)
    }

    pub fn random(quantity: usize) -> Self {
        RandomSelector::new(quantity).into()
    }

    pub fn all() -> Self {
        AllSelector.into()
    }

    pub fn these<'d>(dice: impl IntoIterator<Item = &'d Die>) -> Self {
        TheseSelector::new(dice).into()
    }

    pub fn pipeline(selectors: impl IntoIterator<Item = DiceSelector>) -> DResult<Self> {
        Pipeline::new(selectors).map(Self::from)
    }
}

impl fmt::Display for DiceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highest(x) => fmt::Display::fmt(x, f),
            Self::Lowest(x) => fmt::Display::fmt(x, f),
            Self::EqualTo(x) => fmt::Display::fmt(x, f),
            Self::LessThan(x) => fmt::Display::fmt(x, f),
            Self::LessThanOrEqualTo(x) => fmt::Display::fmt(x, f),
            Self::GreaterThan(x) => fmt::Display::fmt(x, f),
            Self::GreaterThanOrEqualTo(x) => fmt::Display::fmt(x, f),
            Self::In(x) => fmt::Display::fmt(x, f),
            Self::Random(x) => fmt::Display::fmt(x, f),
            Self::All(x) => fmt::Display::fmt(x, f),
            Self::These(x) => fmt::Display::fmt(x, f),
            Self::Pipeline(x) => fmt::Display::fmt(x, f),
        }
    }
}

impl std::str::FromStr for DiceSelector {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(crate::parse::parse(s)?)
    }
}

pub(crate) fn checked_value(value: Value) -> DResult<Value> {
    match value {
        Value::Float(x) if !x.is_finite() => Err(DiceError::invalid_argument(format!(
            "{} cannot be compared against",
            x
        ))),
        value => Ok(value),
    }
}

pub(crate) const fn strict_marker(strictness: Strictness) -> &'static str {
    match strictness {
        Strictness::Loose => "",
        Strictness::Strict => "!",
    }
}

/// Writes `value` the way the selector notation reads it back.
pub(crate) fn fmt_literal(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Str(s) => {
            f.write_char('"')?;
            for c in s.chars() {
                if c == '"' || c == '\\' {
                    f.write_char('\\')?;
                }
                f.write_char(c)?;
            }
            f.write_char('"')
        }
        x => fmt::Display::fmt(x, f),
    }
}
