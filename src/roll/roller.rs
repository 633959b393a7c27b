use crate::common::Int;
use rand::Rng;

/// A source of uniformly distributed integers.
pub trait Roller {
    /// Returns an integer in `min..=max`. Callers guarantee `min <= max`.
    fn roll(&mut self, min: Int, max: Int) -> Int;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, min: Int, max: Int) -> Int {
        self.gen_range(min..=max)
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;

    /// Counts up by `step` from `initial`, wrapping into whatever range is asked for.
    pub(crate) struct StepRoller {
        current: Int,
        step: Int,
    }

    impl StepRoller {
        pub fn new(initial: Int, step: Int) -> Self {
            Self {
                current: initial,
                step,
            }
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, min: Int, max: Int) -> Int {
            let ret = min + (self.current - 1).rem_euclid(max - min + 1);
            self.current += self.step;
            ret
        }
    }
}
