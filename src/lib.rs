//! Dice that roll into values, and selectors that pick dice out of a roll.
//!
//! ```
//! use dice_selector::{Die, DieCollection, DiceSelector, Select};
//!
//! let mut dice: Vec<Die> = (0..4).map(|_| Die::d(6).unwrap()).collect();
//! for die in &mut dice {
//!     die.roll(&mut rand::thread_rng(), 1).unwrap();
//! }
//!
//! let pool: DieCollection = dice.iter().collect();
//! let best = DiceSelector::highest(3).unwrap().select(&pool).unwrap();
//! assert_eq!(best.count(), 3);
//! ```

pub mod cmp;
mod collection;
pub mod common;
mod dice;
mod error;
pub mod parse;
pub mod roll;
pub mod select;

pub use cmp::Strictness;
pub use collection::DieCollection;
pub use common::Value;
pub use dice::{Die, DieId, ParsePoolError, Pool, Sides};
pub use error::{DResult, DiceError};
pub use roll::{DefaultRoller, Roller, StrongRoller};
pub use select::{DiceSelector, Select};
