use crate::common::Value;
use crate::dice::{Die, DieId};
use crate::error::{DResult, DiceError};
use std::collections::BTreeSet;

/// An ordered group of borrowed dice. Selectors read one and build another;
/// they never change the one they were given.
///
/// Two collections are equal when they hold the same dice objects in the
/// same order.
#[derive(Debug, Clone, Default)]
pub struct DieCollection<'a> {
    dice: Vec<&'a Die>,
}

impl<'a> DieCollection<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, die: &'a Die) -> &mut Self {
        self.dice.push(die);
        self
    }

    pub fn get(&self, index: usize) -> DResult<&'a Die> {
        self.dice
            .get(index)
            .copied()
            .ok_or(DiceError::IndexOutOfBounds {
                index,
                len: self.dice.len(),
            })
    }

    pub fn count(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn dice(&self) -> &[&'a Die] {
        &self.dice
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a Die>> {
        self.dice.iter().copied()
    }

    pub fn ids(&self) -> Vec<DieId> {
        self.iter().map(Die::id).collect()
    }

    pub fn contains(&self, die: &Die) -> bool {
        self.iter().any(|d| d.id() == die.id())
    }

    /// The value of every die, in order. Fails if any die hasn't been rolled.
    pub fn values(&self) -> DResult<Vec<&'a Value>> {
        self.iter().map(Die::value).collect()
    }

    /// The dice at `indices`, in ascending index order. Repeated indices
    /// select a die once.
    pub fn filter_by_indices(&self, indices: impl IntoIterator<Item = usize>) -> DResult<Self> {
        let indices: BTreeSet<usize> = indices.into_iter().collect();
        indices.into_iter().map(|i| self.get(i)).collect()
    }

    /// The dice for which `pred` holds, in order. Stops at the first error.
    pub(crate) fn try_filter(
        &self,
        mut pred: impl FnMut(&'a Die) -> DResult<bool>,
    ) -> DResult<Self> {
        let mut ret = Self::new();
        for die in self.iter() {
            if pred(die)? {
                ret.add(die);
            }
        }
        Ok(ret)
    }
}

impl PartialEq for DieCollection<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count() && self.iter().zip(other.iter()).all(|(a, b)| a.id() == b.id())
    }
}

impl Eq for DieCollection<'_> {}

impl<'a> From<Vec<&'a Die>> for DieCollection<'a> {
    fn from(dice: Vec<&'a Die>) -> Self {
        Self { dice }
    }
}

impl<'a> FromIterator<&'a Die> for DieCollection<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Die>>(iter: I) -> Self {
        Self {
            dice: iter.into_iter().collect(),
        }
    }
}

impl<'a> Extend<&'a Die> for DieCollection<'a> {
    fn extend<I: IntoIterator<Item = &'a Die>>(&mut self, iter: I) {
        self.dice.extend(iter);
    }
}

impl<'a, 'c> IntoIterator for &'c DieCollection<'a> {
    type Item = &'a Die;
    type IntoIter = std::iter::Copied<std::slice::Iter<'c, &'a Die>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
