//! Single-pass reader that turns a canonical format string back into an [`InsnFormat`].
//!
//! The grammar needs one character of lookahead and never backtracks, so parsing is a
//! straight scan over the code points of the input.

use super::arg::{Arg, ArgKind, PostprocessOp};
use super::error::ParseError;
use super::format::{EMPTY_FORMAT, InsnFormat};
use super::slot::{Slot, int_reg_offset, offset_from_char};

/// Position into an immutable sequence of code points.
struct Cursor<'src> {
    chars: &'src [char],
    position: usize,
}

impl<'src> Cursor<'src> {
    fn new(chars: &'src [char]) -> Self {
        Self { chars, position: 0 }
    }

    fn at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Consumes the next character, returning it with its position.
    fn bump(&mut self, expected: &'static str) -> Result<(char, usize), ParseError> {
        let ch = self.peek().ok_or(ParseError::UnexpectedEnd { expected })?;
        let position = self.position;
        self.position += 1;
        Ok((ch, position))
    }
}

pub fn parse_insn_format(input: &str) -> Result<InsnFormat, ParseError> {
    if input == EMPTY_FORMAT {
        return Ok(InsnFormat::default());
    }

    let chars: Vec<char> = input.chars().collect();
    let mut cursor = Cursor::new(&chars);

    let mut args = Vec::new();
    while !cursor.at_end() {
        args.push(consume_arg(&mut cursor)?);
    }
    Ok(InsnFormat::new(args))
}

fn consume_arg(cursor: &mut Cursor<'_>) -> Result<Arg, ParseError> {
    let (prefix, position) = cursor.bump("format arg")?;

    if let Some(offset) = int_reg_offset(prefix) {
        return Ok(Arg::register(ArgKind::IntReg, offset));
    }

    let kind = match prefix {
        'C' => ArgKind::FCCReg,
        'F' => ArgKind::FPReg,
        'V' => ArgKind::VReg,
        'X' => ArgKind::XReg,
        'S' => ArgKind::SignedImm,
        'U' => ArgKind::UnsignedImm,
        ch => return Err(ParseError::InvalidPrefixChar { ch, position }),
    };

    if kind.is_reg() {
        let offset = consume_offset(cursor)?;
        return Ok(Arg::register(kind, offset));
    }

    let slots = consume_slots(cursor)?;
    let post = maybe_consume_postprocess_op(cursor)?;
    Ok(Arg::new(kind, slots).with_post(post))
}

fn consume_offset(cursor: &mut Cursor<'_>) -> Result<u32, ParseError> {
    let (ch, position) = cursor.bump("offset char")?;
    offset_from_char(ch).ok_or(ParseError::InvalidOffsetChar { ch, position })
}

/// Reads `(offset char, width)` pairs for as long as an offset character follows.
fn consume_slots(cursor: &mut Cursor<'_>) -> Result<Vec<Slot>, ParseError> {
    let start = cursor.position;
    let mut slots = Vec::new();
    while cursor.peek().and_then(offset_from_char).is_some() {
        let offset = consume_offset(cursor)?;
        let width = consume_number(cursor)?;
        slots.push(Slot::new(offset, width));
    }
    if slots.is_empty() {
        return Err(ParseError::NoSlotConsumed { position: start });
    }
    Ok(slots)
}

fn maybe_consume_postprocess_op(cursor: &mut Cursor<'_>) -> Result<PostprocessOp, ParseError> {
    if cursor.peek() != Some('p') {
        return Ok(PostprocessOp::None);
    }
    cursor.position += 1;

    let (ch, position) = cursor.bump("postprocess op kind char")?;
    let make: fn(u32) -> PostprocessOp = match ch {
        'p' => PostprocessOp::Add,
        's' => PostprocessOp::ShiftLeft,
        ch => return Err(ParseError::InvalidPostprocessChar { ch, position }),
    };
    Ok(make(consume_number(cursor)?))
}

/// One or more ASCII digits, read greedily.
fn consume_number(cursor: &mut Cursor<'_>) -> Result<u32, ParseError> {
    let start = cursor.position;
    let mut value = 0u32;
    while let Some(digit) = cursor.peek().and_then(|ch| ch.to_digit(10)) {
        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add(digit))
            .ok_or(ParseError::NumberOverflow { position: start })?;
        cursor.position += 1;
    }
    if cursor.position == start {
        return Err(ParseError::MissingNumber { position: start });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keyword_yields_no_args() {
        let format = parse_insn_format("EMPTY").expect("EMPTY parses");
        assert!(format.is_empty());
    }

    #[test]
    fn parses_registers_and_multi_slot_immediates() {
        let format = parse_insn_format("JSd5k16").expect("beqz format parses");
        assert_eq!(
            format.args,
            vec![
                Arg::register(ArgKind::IntReg, 5),
                Arg::signed_imm([Slot::new(0, 5), Slot::new(10, 16)]),
            ]
        );
    }

    #[test]
    fn parses_postprocess_suffixes() {
        let format = parse_insn_format("DJKUa2pp1").expect("alsl format parses");
        assert_eq!(
            format.args[3],
            Arg::unsigned_imm([Slot::new(15, 2)]).with_post(PostprocessOp::Add(1))
        );

        let format = parse_insn_format("DJSk14ps2").expect("shifted format parses");
        assert_eq!(format.args[2].post, PostprocessOp::ShiftLeft(2));
    }

    #[test]
    fn parses_vector_and_fcc_registers() {
        let format = parse_insn_format("VdJSk8Un1").expect("vstelm format parses");
        assert_eq!(format.args[0], Arg::register(ArgKind::VReg, 0));
        assert_eq!(format.args[3], Arg::unsigned_imm([Slot::new(18, 1)]));

        let format = parse_insn_format("CdFj").expect("fcc format parses");
        assert_eq!(format.args[0].slots[0], Slot::new(0, 3));
        assert_eq!(format.args[1], Arg::register(ArgKind::FPReg, 5));
    }

    #[test]
    fn reports_offending_characters() {
        assert_eq!(
            parse_insn_format("DQ"),
            Err(ParseError::InvalidPrefixChar { ch: 'Q', position: 1 })
        );
        assert_eq!(
            parse_insn_format("Cz"),
            Err(ParseError::InvalidOffsetChar { ch: 'z', position: 1 })
        );
        assert_eq!(
            parse_insn_format("Sd5px1"),
            Err(ParseError::InvalidPostprocessChar { ch: 'x', position: 4 })
        );
    }

    #[test]
    fn immediates_need_a_slot() {
        assert_eq!(
            parse_insn_format("DS"),
            Err(ParseError::NoSlotConsumed { position: 2 })
        );
        assert_eq!(
            parse_insn_format("UD"),
            Err(ParseError::NoSlotConsumed { position: 1 })
        );
    }

    #[test]
    fn truncated_input_is_an_error_not_a_panic() {
        assert!(matches!(
            parse_insn_format("F"),
            Err(ParseError::UnexpectedEnd { .. })
        ));
        assert_eq!(
            parse_insn_format("Sd"),
            Err(ParseError::MissingNumber { position: 2 })
        );
        assert!(matches!(
            parse_insn_format("Sd5p"),
            Err(ParseError::UnexpectedEnd { .. })
        ));
        assert_eq!(
            parse_insn_format("Sd5ps"),
            Err(ParseError::MissingNumber { position: 5 })
        );
    }

    #[test]
    fn empty_input_yields_no_args() {
        let format = parse_insn_format("").expect("empty input parses");
        assert_eq!(format, InsnFormat::default());
    }

    #[test]
    fn oversized_numbers_overflow() {
        assert_eq!(
            parse_insn_format("Sd99999999999"),
            Err(ParseError::NumberOverflow { position: 2 })
        );
    }

    #[test]
    fn leading_zeros_are_accepted() {
        let format = parse_insn_format("Uk005").expect("leading zeros parse");
        assert_eq!(format.args[0].slots[0], Slot::new(10, 5));
    }
}
