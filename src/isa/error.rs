use std::{error::Error, fmt};

use super::arg::ArgKind;
use super::slot::Slot;

/// Structural failures raised while validating slots, args, formats, and descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MalformedSlot {
        slot: Slot,
        reason: &'static str,
    },
    MalformedArg {
        kind: ArgKind,
        reason: String,
    },
    OverlappingSlots {
        slot: Slot,
    },
    OverlappingArgs {
        arg: String,
    },
    RegisterAfterImmediate {
        arg: String,
    },
    EmptyMnemonic,
    WordOverlapsArgs {
        word: u32,
        args_bitmask: u32,
    },
    OrigFormatBitsDiffer {
        format_bitmask: u32,
        orig_bitmask: u32,
    },
    OperandCountMismatch {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MalformedSlot { slot, reason } => write!(
                f,
                "malformed slot (offset {}, width {}): {reason}",
                slot.offset, slot.width
            ),
            ValidationError::MalformedArg { kind, reason } => {
                write!(f, "malformed {kind} arg: {reason}")
            }
            ValidationError::OverlappingSlots { slot } => {
                write!(f, "slot {slot} overlapped with other slots")
            }
            ValidationError::OverlappingArgs { arg } => {
                write!(f, "arg {arg} overlapped with other args")
            }
            ValidationError::RegisterAfterImmediate { arg } => {
                write!(f, "register arg {arg} comes after immediate arg")
            }
            ValidationError::EmptyMnemonic => write!(f, "empty mnemonic"),
            ValidationError::WordOverlapsArgs { word, args_bitmask } => write!(
                f,
                "insn word 0x{word:08x} has non-zero bits 0x{:08x} inside arg slots",
                word & args_bitmask
            ),
            ValidationError::OrigFormatBitsDiffer {
                format_bitmask,
                orig_bitmask,
            } => write!(
                f,
                "orig_fmt claims bits 0x{orig_bitmask:08x} but format claims 0x{format_bitmask:08x}"
            ),
            ValidationError::OperandCountMismatch { expected, found } => {
                write!(f, "expected {expected} operands, got {found}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Lexical and grammar failures raised while parsing formats and description lines.
///
/// Character positions count Unicode code points from the start of the parsed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidPrefixChar { ch: char, position: usize },
    InvalidOffsetChar { ch: char, position: usize },
    InvalidPostprocessChar { ch: char, position: usize },
    NoSlotConsumed { position: usize },
    MissingNumber { position: usize },
    NumberOverflow { position: usize },
    UnexpectedEnd { expected: &'static str },
    MalformedLine { reason: &'static str },
    MalformedAttribute { key: String, source: Box<ParseError> },
    Invalid(ValidationError),
}

impl From<ValidationError> for ParseError {
    fn from(err: ValidationError) -> Self {
        ParseError::Invalid(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidPrefixChar { ch, position } => {
                write!(f, "invalid prefix char {ch:?} at {position}")
            }
            ParseError::InvalidOffsetChar { ch, position } => {
                write!(f, "invalid offset char {ch:?} at {position}")
            }
            ParseError::InvalidPostprocessChar { ch, position } => {
                write!(f, "invalid postprocess op kind char {ch:?} at {position}")
            }
            ParseError::NoSlotConsumed { position } => {
                write!(f, "no slot was consumed at {position}")
            }
            ParseError::MissingNumber { position } => {
                write!(f, "expected decimal number at {position}")
            }
            ParseError::NumberOverflow { position } => {
                write!(f, "decimal number starting at {position} is out of range")
            }
            ParseError::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of format, expected {expected}")
            }
            ParseError::MalformedLine { reason } => {
                write!(f, "malformed insn description line: {reason}")
            }
            ParseError::MalformedAttribute { key, source } => {
                write!(f, "malformed value for attribute '{key}': {source}")
            }
            ParseError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::MalformedAttribute { source, .. } => Some(source.as_ref()),
            ParseError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}
