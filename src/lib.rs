pub mod isa;
pub mod loader;

pub use isa::{
    Arg, ArgKind, InsnDescription, InsnFormat, ParseError, PostprocessOp, Slot, ValidationError,
    parse_description_line, parse_insn_format,
};
