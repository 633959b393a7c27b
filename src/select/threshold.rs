use super::{checked_value, fmt_literal, strict_marker, Select};
use crate::cmp::{compare, equals, Strictness};
use crate::collection::DieCollection;
use crate::common::Value;
use crate::error::DResult;
use crate::roll::Roller;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

macro_rules! threshold_selector {
    ($($(#[$meta:meta])* $Name:ident => $op:literal, |$ord:ident| $test:expr;)+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $Name {
            threshold: Value,
            strictness: Strictness,
        }

        impl $Name {
            pub fn new(threshold: impl Into<Value>, strictness: Strictness) -> DResult<Self> {
                Ok(Self {
                    threshold: checked_value(threshold.into())?,
                    strictness,
                })
            }

            pub fn threshold(&self) -> &Value {
                &self.threshold
            }

            pub fn strictness(&self) -> Strictness {
                self.strictness
            }
        }

        impl Select for $Name {
            fn select_with<'a, R: Roller + ?Sized>(
                &self,
                dice: &DieCollection<'a>,
                _: &mut R,
            ) -> DResult<DieCollection<'a>> {
                let ret = dice.try_filter(|die| match die.value() {
                    Ok(value) => compare(value, &self.threshold, self.strictness).map(|$ord| $test),
                    Err(_) => Ok(false),
                })?;
                debug!(selector = %self, input = dice.count(), output = ret.count(), "selected dice");
                Ok(ret)
            }
        }

        impl fmt::Display for $Name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $op, strict_marker(self.strictness))?;
                fmt_literal(&self.threshold, f)
            }
        }
    )+};
}

threshold_selector! {
    /// Dice whose value is below the threshold.
    LessThanSelector => "<", |ord| ord == Ordering::Less;
    LessThanOrEqualToSelector => "<=", |ord| ord != Ordering::Greater;
    /// Dice whose value is above the threshold.
    GreaterThanSelector => ">", |ord| ord == Ordering::Greater;
    GreaterThanOrEqualToSelector => ">=", |ord| ord != Ordering::Less;
}

/// Dice whose value equals a given value.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualToSelector {
    value: Value,
    strictness: Strictness,
}

impl EqualToSelector {
    pub fn new(value: impl Into<Value>, strictness: Strictness) -> DResult<Self> {
        Ok(Self {
            value: checked_value(value.into())?,
            strictness,
        })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }
}

impl Select for EqualToSelector {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        _: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let ret = dice.try_filter(|die| {
            Ok(die
                .value()
                .map_or(false, |value| equals(value, &self.value, self.strictness)))
        })?;
        debug!(selector = %self, input = dice.count(), output = ret.count(), "selected dice");
        Ok(ret)
    }
}

impl fmt::Display for EqualToSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "={}", strict_marker(self.strictness))?;
        fmt_literal(&self.value, f)
    }
}

/// Dice whose value is one of a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct InSelector {
    values: Vec<Value>,
    strictness: Strictness,
}

impl InSelector {
    pub fn new<V: Into<Value>>(
        values: impl IntoIterator<Item = V>,
        strictness: Strictness,
    ) -> DResult<Self> {
        let values = values
            .into_iter()
            .map(|v| checked_value(v.into()))
            .collect::<DResult<_>>()?;
        Ok(Self { values, strictness })
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    fn contains(&self, value: &Value) -> bool {
        self.values
            .iter()
            .any(|member| equals(value, member, self.strictness))
    }
}

impl Select for InSelector {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        _: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let ret = dice.try_filter(|die| Ok(die.value().map_or(false, |value| self.contains(value))))?;
        debug!(selector = %self, input = dice.count(), output = ret.count(), "selected dice");
        Ok(ret)
    }
}

impl fmt::Display for InSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", strict_marker(self.strictness))?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt_literal(value, f)?;
        }
        f.write_str("}")
    }
}
