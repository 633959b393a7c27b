//! The selector notation, e.g. `h3`, `<=!4`, `{1, "red"}`, `l2 >1`.

mod lexer;
mod parser;

use crate::select::DiceSelector;

pub use lexer::TokenKind;
pub use parser::{ParseError, ParseErrorKind};

pub(crate) fn parse(s: &str) -> Result<DiceSelector, ParseError> {
    parser::Parser::new(s).parse()
}
