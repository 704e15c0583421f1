//! Contiguous bit ranges inside a 32-bit instruction word and the offset-character tables used
//! by their canonical representation.

use std::fmt;

use super::error::ValidationError;

/// Bit offsets that have a canonical lowercase character, in ascending offset order.
const OFFSET_CHARS: [(u32, char); 6] = [
    (0, 'd'),
    (5, 'j'),
    (10, 'k'),
    (15, 'a'),
    (16, 'm'),
    (18, 'n'),
];

/// Fixed int-register positions, written as a single uppercase character.
const INT_REG_CHARS: [(u32, char); 4] = [(0, 'D'), (5, 'J'), (10, 'K'), (15, 'A')];

/// Rendered in place of an offset character for values that never passed validation.
pub(crate) const UNMAPPED_CHAR: char = '?';

pub const WORD_BITS: u32 = 32;

pub fn offset_char(offset: u32) -> Option<char> {
    OFFSET_CHARS
        .iter()
        .find(|(candidate, _)| *candidate == offset)
        .map(|(_, ch)| *ch)
}

pub fn offset_from_char(ch: char) -> Option<u32> {
    OFFSET_CHARS
        .iter()
        .find(|(_, candidate)| *candidate == ch)
        .map(|(offset, _)| *offset)
}

pub fn int_reg_char(offset: u32) -> Option<char> {
    INT_REG_CHARS
        .iter()
        .find(|(candidate, _)| *candidate == offset)
        .map(|(_, ch)| *ch)
}

pub fn int_reg_offset(ch: char) -> Option<u32> {
    INT_REG_CHARS
        .iter()
        .find(|(_, candidate)| *candidate == ch)
        .map(|(offset, _)| *offset)
}

/// A contiguous run of `width` bits starting at bit `offset` (LSB = 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub offset: u32,
    pub width: u32,
}

impl Slot {
    pub fn new(offset: u32, width: u32) -> Self {
        Self { offset, width }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let reason = if self.offset >= WORD_BITS {
            "offset exceeds bit 31"
        } else if self.width == 0 {
            "width is zero"
        } else if self.msb() >= WORD_BITS {
            "slot spans beyond insn word"
        } else {
            return Ok(());
        };
        Err(ValidationError::MalformedSlot {
            slot: *self,
            reason,
        })
    }

    /// Index of the most significant bit covered by the slot.
    pub fn msb(&self) -> u32 {
        self.offset.saturating_add(self.width).saturating_sub(1)
    }

    /// Bits `[offset, msb]` set. Bits past the word are dropped on invalid slots.
    ///
    /// With offset 5 and width 5 the MSB is bit 9, so the mask is
    /// `0b11_1111_1111 - 0b1_1111 = 0b11_1110_0000`.
    pub fn bitmask(&self) -> u32 {
        if self.width == 0 || self.offset >= WORD_BITS {
            return 0;
        }
        let msb = u64::from(self.msb().min(WORD_BITS - 1));
        let below_offset = (1u64 << self.offset) - 1;
        let through_msb = (1u64 << (msb + 1)) - 1;
        (through_msb - below_offset) as u32
    }

    /// Offset character followed by the decimal width, e.g. `k16`.
    pub fn canonical_repr(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    pub(crate) fn write_canonical(&self, out: &mut String) {
        out.push(offset_char(self.offset).unwrap_or(UNMAPPED_CHAR));
        out.push_str(&self.width.to_string());
    }

    /// Whether the offset has a canonical character at all.
    pub(crate) fn is_encodable(&self) -> bool {
        offset_char(self.offset).is_some()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validate().is_err() || !self.is_encodable() {
            return write!(
                f,
                "<invalid Slot offset={} width={}>",
                self.offset, self.width
            );
        }
        write!(f, "<Slot {}>", self.canonical_repr())
    }
}
