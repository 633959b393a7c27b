use super::{DiceSelector, Select};
use crate::collection::DieCollection;
use crate::common::{Int, NonEmpty};
use crate::dice::{Die, DieId};
use crate::error::{DResult, DiceError};
use crate::roll::Roller;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Every die, unchanged.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AllSelector;

impl Select for AllSelector {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        _: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let ret = dice.clone();
        debug!(selector = %self, input = dice.count(), output = ret.count(), "selected dice");
        Ok(ret)
    }
}

impl fmt::Display for AllSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*")
    }
}

/// Particular die objects, if they are in the collection. Copies of a die
/// don't count as the die.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TheseSelector {
    ids: BTreeSet<DieId>,
}

impl TheseSelector {
    pub fn new<'d>(dice: impl IntoIterator<Item = &'d Die>) -> Self {
        Self {
            ids: dice.into_iter().map(Die::id).collect(),
        }
    }
}

impl Select for TheseSelector {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        _: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let ret: DieCollection = dice
            .iter()
            .filter(|die| self.ids.contains(&die.id()))
            .collect();
        debug!(selector = %self, input = dice.count(), output = ret.count(), "selected dice");
        Ok(ret)
    }
}

impl fmt::Display for TheseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("these[")?;
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(id, f)?;
        }
        f.write_str("]")
    }
}

/// `quantity` distinct dice drawn uniformly, returned in input order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RandomSelector {
    quantity: usize,
}

impl RandomSelector {
    pub const fn new(quantity: usize) -> Self {
        Self { quantity }
    }

    pub const fn quantity(&self) -> usize {
        self.quantity
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new(1)
    }
}

fn to_int(x: usize) -> DResult<Int> {
    Int::try_from(x).map_err(|_| DiceError::invalid_argument("collection is too large to sample"))
}

impl Select for RandomSelector {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        roller: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let len = dice.count();
        if self.quantity > len {
            return Err(DiceError::invalid_argument(format!(
                "cannot select {} random dice from a collection of {}",
                self.quantity, len
            )));
        }

        // Partial Fisher-Yates: the first `quantity` slots end up a uniform sample.
        let mut indices: Vec<usize> = (0..len).collect();
        for i in 0..self.quantity {
            let drawn = roller.roll(to_int(i)?, to_int(len - 1)?);
            let j = usize::try_from(drawn)
                .ok()
                .filter(|j| (i..len).contains(j))
                .ok_or_else(|| {
                    DiceError::invalid_state(format!(
                        "roller returned {} outside of {}..={}",
                        drawn,
                        i,
                        len - 1
                    ))
                })?;
            indices.swap(i, j);
        }
        indices.truncate(self.quantity);

        let ret = dice.filter_by_indices(indices)?;
        debug!(selector = %self, input = len, output = ret.count(), "selected dice");
        Ok(ret)
    }
}

impl fmt::Display for RandomSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.quantity)
    }
}

/// Selectors applied one after another, each to what the previous one kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline(NonEmpty<DiceSelector>);

impl Pipeline {
    pub fn new(selectors: impl IntoIterator<Item = DiceSelector>) -> DResult<Self> {
        NonEmpty::try_from_vec(selectors.into_iter().collect())
            .map(Self)
            .map_err(|_| DiceError::invalid_argument("a pipeline needs at least one selector"))
    }

    pub fn selectors(&self) -> &[DiceSelector] {
        self.0.as_slice()
    }
}

impl From<NonEmpty<DiceSelector>> for Pipeline {
    fn from(selectors: NonEmpty<DiceSelector>) -> Self {
        Self(selectors)
    }
}

impl Select for Pipeline {
    fn select_with<'a, R: Roller + ?Sized>(
        &self,
        dice: &DieCollection<'a>,
        roller: &mut R,
    ) -> DResult<DieCollection<'a>> {
        let mut current = dice.clone();
        for selector in self.0.iter() {
            current = selector.select_with(&current, &mut *roller)?;
        }
        debug!(selector = %self, input = dice.count(), output = current.count(), "selected dice");
        Ok(current)
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(selector, f)?;
        }
        Ok(())
    }
}
