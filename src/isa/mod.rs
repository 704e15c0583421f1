//! Instruction encoding descriptions: bit slots, operands, formats, and the parsers for their
//! canonical text forms.
//!
//! Everything in this module is pure: values are built once, validated, and never mutated by the
//! parsers.

pub mod arg;
pub mod description;
pub mod error;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod slot;

pub use arg::{Arg, ArgKind, PostprocessOp};
pub use description::{Attributes, InsnDescription};
pub use error::{ParseError, ValidationError};
pub use format::InsnFormat;
pub use lexer::parse_insn_format;
pub use parser::{ORIG_FMT_KEY, parse_description_line};
pub use slot::Slot;
