use std::fmt;
use std::num::NonZeroUsize;
pub use vec1::vec1;

pub type Int = i64;
pub type Float = f64;

pub type Num = NonZeroUsize;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// The face of a die: a number or a label.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(Int),
    Float(Float),
    Str(String),
}

impl Value {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    pub(crate) fn is_nan(&self) -> bool {
        matches!(self, Self::Float(x) if x.is_nan())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::Float(x) => fmt::Debug::fmt(x, f),
            Self::Str(s) => write!(f, "{:?}", s),
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for Value {
            fn from(x: $t) -> Self {
                Self::Int(x.into())
            }
        })+
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(x.into())
    }
}

impl From<Float> for Value {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
