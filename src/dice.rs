use crate::common::{Int, NonEmpty, Value};
use crate::error::{DResult, DiceError};
use crate::roll::Roller;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static NEXT_DIE_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one [`Die`] object for as long as the process runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DieId(u64);

impl DieId {
    fn next() -> Self {
        Self(NEXT_DIE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The faces of a die, in order. Always at least two.
#[derive(Debug, Clone, PartialEq)]
pub struct Sides(NonEmpty<Value>);

impl Sides {
    /// The most faces [`Sides::range`] builds.
    pub const MAX_RANGE: Int = 1 << 16;

    pub fn new<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> DResult<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() < 2 {
            return Err(DiceError::invalid_argument(
                "a die must have at least 2 sides",
            ));
        }
        if let Some(bad) = values.iter().find(|v| v.is_nan()) {
            return Err(DiceError::invalid_argument(format!(
                "{} is not a valid side",
                bad
            )));
        }
        NonEmpty::try_from_vec(values)
            .map(Self)
            .map_err(|_| DiceError::invalid_argument("a die must have at least 2 sides"))
    }

    /// The sides `1..=n`, for `n` in `2..=MAX_RANGE`.
    pub fn range(n: Int) -> DResult<Self> {
        if !(2..=Self::MAX_RANGE).contains(&n) {
            return Err(DiceError::invalid_argument(format!(
                "a numbered die has 2 to {} sides, {} given",
                Self::MAX_RANGE,
                n
            )));
        }
        Self::new((1..=n).map(Value::Int))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl TryFrom<Int> for Sides {
    type Error = DiceError;

    fn try_from(n: Int) -> Result<Self, Self::Error> {
        Self::range(n)
    }
}

impl TryFrom<Vec<Value>> for Sides {
    type Error = DiceError;

    fn try_from(values: Vec<Value>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// A rollable die. Holds its last rolled value and, when enabled, every value
/// it has rolled since the history was last cleared.
///
/// Cloning a die gives a new die (with a new [`DieId`]) in the same state.
#[derive(Debug)]
pub struct Die {
    id: DieId,
    sides: Sides,
    value: Option<Value>,
    history_enabled: bool,
    history: Vec<Value>,
}

impl Die {
    pub fn new(sides: Sides) -> Self {
        Self {
            id: DieId::next(),
            sides,
            value: None,
            history_enabled: false,
            history: Vec::new(),
        }
    }

    /// A die with the sides `1..=n`.
    pub fn d(n: Int) -> DResult<Self> {
        Sides::range(n).map(Self::new)
    }

    pub fn id(&self) -> DieId {
        self.id
    }

    pub fn sides(&self) -> &Sides {
        &self.sides
    }

    /// Rolls the die `times` times; the last roll becomes its value.
    pub fn roll<R: Roller + ?Sized>(&mut self, roller: &mut R, times: usize) -> DResult<&mut Self> {
        if times == 0 {
            return Err(DiceError::invalid_argument(
                "a die must be rolled at least 1 time",
            ));
        }
        let len = Int::try_from(self.sides.len())
            .map_err(|_| DiceError::invalid_state("too many sides to roll"))?;

        for _ in 0..times {
            let face = roller.roll(1, len);
            let value = face
                .checked_sub(1)
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| self.sides.get(i))
                .cloned()
                .ok_or_else(|| {
                    DiceError::invalid_state(format!(
                        "roller returned {} outside of 1..={}",
                        face, len
                    ))
                })?;
            trace!(die = %self.id, face, value = %value, "rolled");
            self.set_value(value);
        }
        Ok(self)
    }

    fn set_value(&mut self, value: Value) {
        if self.history_enabled {
            self.history.push(value.clone());
        }
        self.value = Some(value);
    }

    pub fn value(&self) -> DResult<&Value> {
        self.value.as_ref().ok_or(DiceError::NotRolled)
    }

    pub fn is_rolled(&self) -> bool {
        self.value.is_some()
    }

    pub fn enable_history(&mut self, enabled: bool) -> &mut Self {
        self.history_enabled = enabled;
        self
    }

    pub fn disable_history(&mut self, disabled: bool) -> &mut Self {
        self.history_enabled = !disabled;
        self
    }

    pub fn is_history_enabled(&self) -> bool {
        self.history_enabled
    }

    pub fn history(&self) -> &[Value] {
        &self.history
    }

    pub fn clear_history(&mut self) -> &mut Self {
        self.history.clear();
        self
    }
}

impl Clone for Die {
    fn clone(&self) -> Self {
        Self {
            id: DieId::next(),
            sides: self.sides.clone(),
            value: self.value.clone(),
            history_enabled: self.history_enabled,
            history: self.history.clone(),
        }
    }
}

/// A handful of numbered dice, written `NdS` (`4d6`, `d20`, `10D10`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Pool {
    num: usize,
    sides: Int,
}

impl Pool {
    /// The most dice a pool rolls at once.
    pub const MAX_DICE: usize = 1000;

    pub fn new(num: usize, sides: Int) -> DResult<Self> {
        Self::checked(num, sides).map_err(|why| DiceError::invalid_argument(why.to_string()))
    }

    fn checked(num: usize, sides: Int) -> Result<Self, ParsePoolError> {
        if !(1..=Self::MAX_DICE).contains(&num) {
            return Err(ParsePoolError::CountOutOfRange(num));
        }
        if !(2..=Sides::MAX_RANGE).contains(&sides) {
            return Err(ParsePoolError::SidesOutOfRange(sides));
        }
        Ok(Self { num, sides })
    }

    pub fn num(&self) -> usize {
        self.num
    }

    pub fn sides(&self) -> Int {
        self.sides
    }

    /// Creates and rolls every die of the pool once.
    pub fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> DResult<Vec<Die>> {
        let sides = Sides::range(self.sides)?;
        (0..self.num)
            .map(|_| {
                let mut die = Die::new(sides.clone());
                die.roll(&mut *roller, 1)?;
                Ok(die)
            })
            .collect()
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.num, self.sides)
    }
}

impl std::str::FromStr for Pool {
    type Err = ParsePoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, sides) = s
            .split_once(|c| c == 'd' || c == 'D')
            .ok_or_else(|| ParsePoolError::Malformed(s.to_owned()))?;
        let num = match num {
            "" => 1,
            n => n
                .parse()
                .map_err(|_| ParsePoolError::BadCount(n.to_owned()))?,
        };
        let sides = sides
            .parse()
            .map_err(|_| ParsePoolError::BadSides(sides.to_owned()))?;
        Self::checked(num, sides)
    }
}

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum ParsePoolError {
    #[error("{0:?} is not a pool, write it as NdS (e.g. 4d6)")]
    Malformed(String),
    #[error("dice count {0:?} is not a whole number")]
    BadCount(String),
    #[error("side count {0:?} is not a whole number")]
    BadSides(String),
    #[error("a pool holds 1 to {max} dice, {0} given", max = Pool::MAX_DICE)]
    CountOutOfRange(usize),
    #[error("a pool die has 2 to {max} sides, {0} given", max = Sides::MAX_RANGE)]
    SidesOutOfRange(Int),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::StepRoller;

    #[test]
    fn test_sides_need_two_values() {
        assert!(Sides::range(2).is_ok());
        assert!(matches!(Sides::range(1), Err(DiceError::InvalidArgument(_))));
        assert!(matches!(Sides::new(["x"]), Err(DiceError::InvalidArgument(_))));
        assert!(matches!(
            Sides::new([1.0, f64::NAN]),
            Err(DiceError::InvalidArgument(_))
        ));
        let colours = Sides::new(["red", "green", "blue"]).unwrap();
        assert_eq!(colours.len(), 3);
        assert_eq!(colours.get(1), Some(&Value::from("green")));
        assert_eq!(
            colours.iter().map(Value::to_string).collect::<Vec<_>>(),
            vec!["\"red\"", "\"green\"", "\"blue\""]
        );
    }

    #[test]
    fn test_range_is_capped_before_allocating() {
        assert_eq!(Sides::range(Sides::MAX_RANGE).unwrap().len(), 1 << 16);
        for n in [Sides::MAX_RANGE + 1, 100_000_000_000, Int::MAX] {
            assert!(matches!(Sides::range(n), Err(DiceError::InvalidArgument(_))));
            assert!(matches!(Die::d(n), Err(DiceError::InvalidArgument(_))));
        }
        assert!(matches!(Sides::range(Int::MIN), Err(DiceError::InvalidArgument(_))));
    }

    #[test]
    fn test_unrolled_die_has_no_value() {
        let die = Die::d(6).unwrap();
        assert!(!die.is_rolled());
        assert_eq!(die.value(), Err(DiceError::NotRolled));
    }

    #[test]
    fn test_roll_picks_side() {
        let mut die = Die::new(Sides::new(["a", "b", "c"]).unwrap());
        die.roll(&mut StepRoller::new(2, 1), 1).unwrap();
        assert_eq!(die.value(), Ok(&Value::from("b")));
        die.roll(&mut StepRoller::new(3, 1), 2).unwrap();
        assert_eq!(die.value(), Ok(&Value::from("a")));
    }

    #[test]
    fn test_roll_zero_times() {
        let mut die = Die::d(6).unwrap();
        assert!(matches!(
            die.roll(&mut StepRoller::new(1, 1), 0),
            Err(DiceError::InvalidArgument(_))
        ));
        assert!(!die.is_rolled());
    }

    #[test]
    fn test_roll_rejects_roller_out_of_range() {
        struct Answer(Int);
        impl Roller for Answer {
            fn roll(&mut self, _: Int, _: Int) -> Int {
                self.0
            }
        }

        let mut die = Die::d(6).unwrap();
        for face in [Int::MIN, 0, 7, Int::MAX] {
            assert!(matches!(
                die.roll(&mut Answer(face), 1),
                Err(DiceError::InvalidState(_))
            ));
        }
        assert!(!die.is_rolled());
    }

    #[test]
    fn test_roll_with_dyn_roller() {
        let mut rng = rand::thread_rng();
        let roller: &mut dyn Roller = &mut rng;
        let mut die = Die::d(20).unwrap();
        die.roll(roller, 3).unwrap();
        assert!(die.is_rolled());
    }

    #[test]
    fn test_history() {
        let mut die = Die::d(6).unwrap();
        let mut roller = StepRoller::new(1, 1);
        die.roll(&mut roller, 1).unwrap();
        assert!(die.history().is_empty());

        die.enable_history(true);
        die.roll(&mut roller, 3).unwrap();
        assert_eq!(die.history(), &[Value::Int(2), Value::Int(3), Value::Int(4)]);

        die.disable_history(true);
        assert!(!die.is_history_enabled());
        die.roll(&mut roller, 1).unwrap();
        assert_eq!(die.history().len(), 3);

        die.clear_history();
        assert!(die.history().is_empty());
        assert_eq!(die.value(), Ok(&Value::Int(5)));
    }

    #[test]
    fn test_clone_is_a_new_die() {
        let mut die = Die::d(6).unwrap();
        die.roll(&mut StepRoller::new(4, 0), 1).unwrap();
        let copy = die.clone();
        assert_ne!(copy.id(), die.id());
        assert_eq!(copy.value(), die.value());
    }

    #[test]
    fn test_pool_notation() {
        let pool = |s: &str| s.parse::<Pool>();
        assert_eq!(pool("4d6"), Ok(Pool::new(4, 6).unwrap()));
        assert_eq!(pool("d20"), Ok(Pool::new(1, 20).unwrap()));
        assert_eq!(pool(" 10D10 "), Ok(Pool::new(10, 10).unwrap()));
        assert_eq!(pool("4d6").unwrap().to_string(), "4d6");

        assert_eq!(pool("6"), Err(ParsePoolError::Malformed("6".into())));
        assert_eq!(pool("xd6"), Err(ParsePoolError::BadCount("x".into())));
        assert_eq!(pool("2d"), Err(ParsePoolError::BadSides("".into())));
        assert_eq!(pool("0d6"), Err(ParsePoolError::CountOutOfRange(0)));
        assert_eq!(pool("1001d6"), Err(ParsePoolError::CountOutOfRange(1001)));
        assert_eq!(pool("3d1"), Err(ParsePoolError::SidesOutOfRange(1)));
    }

    #[test]
    fn test_pool_rejects_huge_sides() {
        assert_eq!(
            "1d9223372036854775807".parse::<Pool>(),
            Err(ParsePoolError::SidesOutOfRange(Int::MAX))
        );
        assert!(matches!(
            "1d9223372036854775808".parse::<Pool>(),
            Err(ParsePoolError::BadSides(_))
        ));
        assert!(matches!(
            Pool::new(1, 100_000_000_000),
            Err(DiceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pool_roll() {
        let dice = Pool::new(3, 6)
            .unwrap()
            .roll(&mut StepRoller::new(5, 1))
            .unwrap();
        let values: Vec<_> = dice.iter().map(|d| d.value().unwrap().clone()).collect();
        assert_eq!(values, vec![Value::Int(5), Value::Int(6), Value::Int(1)]);
    }
}
