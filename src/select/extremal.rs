use super::Select;
use crate::cmp::{compare, ensure_rankable, Strictness};
use crate::collection::DieCollection;
use crate::common::{Num, Value};
use crate::error::{DResult, DiceError};
use crate::roll::Roller;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

fn quantity(n: usize) -> DResult<Num> {
    Num::new(n).ok_or_else(|| DiceError::invalid_argument("quantity must be at least 1"))
}

/// The `n` rolled dice ranking first when sorted by value, in input order.
///
/// The sort is stable, so among equal values the earlier die ranks first and
/// ties straddling the cut are truncated, not all kept.
fn ranked<'a>(dice: &DieCollection<'a>, n: Num, descending: bool) -> DResult<DieCollection<'a>> {
    let mut entries: Vec<(usize, &Value)> = dice
        .iter()
        .enumerate()
        .filter_map(|(i, die)| die.value().ok().map(|value| (i, value)))
        .collect();
    ensure_rankable(entries.iter().map(|&(_, value)| value))?;

    let mut failure = None;
    entries.sort_by(|&(_, a), &(_, b)| {
        let ord = compare(a, b, Strictness::Loose).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            Ordering::Equal
        });
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    dice.filter_by_indices(entries.into_iter().take(n.get()).map(|(i, _)| i))
}

/// The `quantity` dice with the highest values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HighestSelector {
    quantity: Num,
}

impl HighestSelector {
    pub fn new(quantity: usize) -> DResult<Self> {
        Ok(Self {
            quantity: self::quantity(quantity)?,
        })
    }

    pub fn quantity(&self) -> usize {
        self.quantity.get()
    }
}

impl Default for HighestSelector {
    fn default() -> Self {
        Self { quantity: Num::MIN }
    }
}

impl Select for HighestSelector {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        _: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let ret = ranked(dice, self.quantity, true)?;
        debug!(selector = %self, input = dice.count(), output = ret.count(), "selected dice");
        Ok(ret)
    }
}

impl fmt::Display for HighestSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.quantity)
    }
}

/// The `quantity` dice with the lowest values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LowestSelector {
    quantity: Num,
}

impl LowestSelector {
    pub fn new(quantity: usize) -> DResult<Self> {
        Ok(Self {
            quantity: self::quantity(quantity)?,
        })
    }

    pub fn quantity(&self) -> usize {
        self.quantity.get()
    }
}

impl Default for LowestSelector {
    fn default() -> Self {
        Self { quantity: Num::MIN }
    }
}

impl Select for LowestSelector {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        _: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let ret = ranked(dice, self.quantity, false)?;
        debug!(selector = %self, input = dice.count(), output = ret.count(), "selected dice");
        Ok(ret)
    }
}

impl fmt::Display for LowestSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.quantity)
    }
}
