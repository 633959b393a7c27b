mod roller;

pub use roller::Roller;

#[cfg(test)]
pub(crate) use roller::StepRoller;

/// Fast thread-local generator; what [`Select::select`](crate::Select::select) uses.
pub type DefaultRoller = rand::rngs::ThreadRng;

/// Reads from the operating system's cryptographic source on every roll.
pub type StrongRoller = rand::rngs::OsRng;

pub fn default_roller() -> DefaultRoller {
    rand::thread_rng()
}
