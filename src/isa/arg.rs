//! Operands: a kind, the slots that hold its bits, and an optional value transform.

use std::fmt;

use smallvec::SmallVec;

use super::error::ValidationError;
use super::slot::{Slot, UNMAPPED_CHAR, int_reg_char, offset_char};

pub const REG_WIDTH: u32 = 5;
pub const FCC_REG_WIDTH: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgKind {
    IntReg,
    FPReg,
    FCCReg,
    VReg,
    XReg,
    SignedImm,
    UnsignedImm,
}

impl ArgKind {
    pub fn is_imm(self) -> bool {
        matches!(self, ArgKind::SignedImm | ArgKind::UnsignedImm)
    }

    pub fn is_reg(self) -> bool {
        !self.is_imm()
    }

    /// Width every slot of a register kind must have; `None` for immediates.
    pub fn register_width(self) -> Option<u32> {
        match self {
            ArgKind::IntReg | ArgKind::FPReg | ArgKind::VReg | ArgKind::XReg => Some(REG_WIDTH),
            ArgKind::FCCReg => Some(FCC_REG_WIDTH),
            ArgKind::SignedImm | ArgKind::UnsignedImm => None,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::IntReg => "int register",
            ArgKind::FPReg => "float register",
            ArgKind::FCCReg => "fcc register",
            ArgKind::VReg => "vector register",
            ArgKind::XReg => "extended vector register",
            ArgKind::SignedImm => "signed immediate",
            ArgKind::UnsignedImm => "unsigned immediate",
        };
        f.write_str(name)
    }
}

/// Transform applied to a decoded operand whose stored bits differ from its logical value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PostprocessOp {
    #[default]
    None,
    Add(u32),
    ShiftLeft(u32),
}

impl PostprocessOp {
    pub fn is_none(&self) -> bool {
        matches!(self, PostprocessOp::None)
    }

    /// Op letter plus amount (`p2`, `s2`), empty for [`PostprocessOp::None`].
    pub fn canonical_repr(&self) -> String {
        match self {
            PostprocessOp::None => String::new(),
            PostprocessOp::Add(amount) => format!("p{amount}"),
            PostprocessOp::ShiftLeft(amount) => format!("s{amount}"),
        }
    }

    pub fn apply(&self, value: i64) -> i64 {
        match self {
            PostprocessOp::None => value,
            PostprocessOp::Add(amount) => value.wrapping_add(i64::from(*amount)),
            PostprocessOp::ShiftLeft(amount) if *amount >= 64 => 0,
            PostprocessOp::ShiftLeft(amount) => value << amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Arg {
    pub kind: ArgKind,
    /// Slots in bit-concatenation order, most significant first.
    pub slots: SmallVec<[Slot; 2]>,
    pub post: PostprocessOp,
}

impl Arg {
    pub fn new(kind: ArgKind, slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            kind,
            slots: slots.into_iter().collect(),
            post: PostprocessOp::None,
        }
    }

    /// Single-slot register arg; the slot width follows from the kind.
    pub fn register(kind: ArgKind, offset: u32) -> Self {
        let width = kind.register_width().unwrap_or(REG_WIDTH);
        Self::new(kind, [Slot::new(offset, width)])
    }

    pub fn signed_imm(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self::new(ArgKind::SignedImm, slots)
    }

    pub fn unsigned_imm(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self::new(ArgKind::UnsignedImm, slots)
    }

    pub fn with_post(mut self, post: PostprocessOp) -> Self {
        self.post = post;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.slots.is_empty() {
            return Err(self.malformed("arg has no slots".into()));
        }

        if let Some(width) = self.kind.register_width() {
            if self.slots.len() != 1 {
                return Err(self.malformed(format!(
                    "register arg needs exactly one slot, found {}",
                    self.slots.len()
                )));
            }
            if self.slots[0].width != width {
                return Err(self.malformed(format!(
                    "register slot width is {}, expected {width}",
                    self.slots[0].width
                )));
            }
            if !self.post.is_none() {
                return Err(self.malformed("register arg cannot carry a postprocess op".into()));
            }
        }

        let mut seen_slots_mask = 0u32;
        for slot in &self.slots {
            slot.validate()?;
            if self.offset_char_for(slot).is_none() {
                return Err(self.malformed(format!(
                    "slot offset {} has no canonical character",
                    slot.offset
                )));
            }

            let mask = slot.bitmask();
            if mask & seen_slots_mask != 0 {
                return Err(ValidationError::OverlappingSlots { slot: *slot });
            }
            seen_slots_mask |= mask;
        }

        Ok(())
    }

    pub fn bitmask(&self) -> u32 {
        self.slots.iter().fold(0, |mask, slot| mask | slot.bitmask())
    }

    /// Width of the logical value once all slots are concatenated.
    pub fn total_width(&self) -> u32 {
        self.slots
            .iter()
            .fold(0u32, |width, slot| width.saturating_add(slot.width))
    }

    pub fn canonical_repr(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    pub(crate) fn write_canonical(&self, out: &mut String) {
        let first_char = || {
            self.slots
                .first()
                .and_then(|slot| self.offset_char_for(slot))
                .unwrap_or(UNMAPPED_CHAR)
        };

        match self.kind {
            ArgKind::IntReg => out.push(first_char()),
            ArgKind::FPReg => {
                out.push('F');
                out.push(first_char());
            }
            ArgKind::FCCReg => {
                out.push('C');
                out.push(first_char());
            }
            ArgKind::VReg => {
                out.push('V');
                out.push(first_char());
            }
            ArgKind::XReg => {
                out.push('X');
                out.push(first_char());
            }
            ArgKind::SignedImm | ArgKind::UnsignedImm => {
                out.push(if self.kind == ArgKind::SignedImm { 'S' } else { 'U' });
                for slot in &self.slots {
                    slot.write_canonical(out);
                }
            }
        }

        if !self.post.is_none() {
            out.push('p');
            out.push_str(&self.post.canonical_repr());
        }
    }

    /// Gathers the raw operand value out of `word`, first slot landing in the high bits.
    pub fn extract(&self, word: u32) -> u32 {
        let mut value = 0u64;
        for slot in &self.slots {
            let field = (u64::from(word) >> slot.offset.min(31)) & width_mask(slot.width);
            value = (value << slot.width.min(32)) | field;
        }
        value as u32
    }

    /// Scatters `value` into the arg's slots of `word`, truncated to [`Arg::total_width`].
    pub fn insert(&self, word: u32, value: u32) -> u32 {
        let mut word = u64::from(word);
        let mut remaining = self.total_width();
        for slot in &self.slots {
            remaining = remaining.saturating_sub(slot.width);
            if slot.offset >= 32 {
                continue;
            }
            let field = if remaining >= 32 {
                0
            } else {
                (u64::from(value) >> remaining) & width_mask(slot.width)
            };
            word = (word & !u64::from(slot.bitmask())) | ((field << slot.offset) & 0xffff_ffff);
        }
        word as u32
    }

    /// Logical operand value: sign-extended for signed immediates, then post-processed.
    pub fn decode(&self, word: u32) -> i64 {
        let raw = i64::from(self.extract(word));
        let width = self.total_width();
        let value = if self.kind == ArgKind::SignedImm && (1..64).contains(&width) {
            let sign_bit = 1i64 << (width - 1);
            if raw & sign_bit != 0 { raw - (sign_bit << 1) } else { raw }
        } else {
            raw
        };
        self.post.apply(value)
    }

    fn offset_char_for(&self, slot: &Slot) -> Option<char> {
        match self.kind {
            ArgKind::IntReg => int_reg_char(slot.offset),
            _ => offset_char(slot.offset),
        }
    }

    fn malformed(&self, reason: String) -> ValidationError {
        ValidationError::MalformedArg {
            kind: self.kind,
            reason,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validate().is_err() {
            return write!(f, "<invalid Arg {:?} {:?}>", self.kind, self.slots.as_slice());
        }
        write!(f, "<Arg {}>", self.canonical_repr())
    }
}

fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_args_encode_offset_characters() {
        assert_eq!(Arg::register(ArgKind::IntReg, 0).canonical_repr(), "D");
        assert_eq!(Arg::register(ArgKind::IntReg, 15).canonical_repr(), "A");
        assert_eq!(Arg::register(ArgKind::FPReg, 5).canonical_repr(), "Fj");
        assert_eq!(Arg::register(ArgKind::FCCReg, 5).canonical_repr(), "Cj");
        assert_eq!(Arg::register(ArgKind::VReg, 10).canonical_repr(), "Vk");
        assert_eq!(Arg::register(ArgKind::XReg, 16).canonical_repr(), "Xm");
    }

    #[test]
    fn immediate_repr_lists_slots_then_postprocess() {
        let arg = Arg::signed_imm([Slot::new(0, 5), Slot::new(10, 16)]);
        assert_eq!(arg.canonical_repr(), "Sd5k16");

        let shifted = Arg::signed_imm([Slot::new(10, 14)]).with_post(PostprocessOp::ShiftLeft(2));
        assert_eq!(shifted.canonical_repr(), "Sk14ps2");

        let biased = Arg::unsigned_imm([Slot::new(15, 2)]).with_post(PostprocessOp::Add(1));
        assert_eq!(biased.canonical_repr(), "Ua2pp1");
    }

    #[test]
    fn register_width_rules_per_kind() {
        let wide_fcc = Arg::new(ArgKind::FCCReg, [Slot::new(0, 5)]);
        assert!(matches!(
            wide_fcc.validate(),
            Err(ValidationError::MalformedArg { kind: ArgKind::FCCReg, .. })
        ));

        let two_slot_reg = Arg::new(ArgKind::IntReg, [Slot::new(0, 5), Slot::new(5, 5)]);
        assert!(two_slot_reg.validate().is_err(), "registers hold exactly one slot");

        let empty = Arg::unsigned_imm([]);
        assert!(empty.validate().is_err(), "args need at least one slot");

        Arg::register(ArgKind::FCCReg, 0)
            .validate()
            .expect("three-bit fcc slot is valid");
    }

    #[test]
    fn int_register_must_sit_on_fixed_positions() {
        let err = Arg::register(ArgKind::IntReg, 16).validate().unwrap_err();
        assert!(
            err.to_string().contains("no canonical character"),
            "unexpected error: {err}"
        );
        Arg::register(ArgKind::VReg, 16)
            .validate()
            .expect("vector registers use the lowercase table");
    }

    #[test]
    fn overlapping_slots_name_the_offender() {
        let arg = Arg::unsigned_imm([Slot::new(0, 6), Slot::new(5, 5)]);
        assert_eq!(
            arg.validate(),
            Err(ValidationError::OverlappingSlots {
                slot: Slot::new(5, 5)
            })
        );
    }

    #[test]
    fn register_rejects_postprocess() {
        let arg = Arg::register(ArgKind::IntReg, 0).with_post(PostprocessOp::Add(1));
        assert!(arg.validate().is_err());
    }

    #[test]
    fn bitmask_and_width_span_all_slots() {
        let arg = Arg::signed_imm([Slot::new(0, 5), Slot::new(10, 16)]);
        assert_eq!(arg.bitmask(), 0x03ff_fc1f);
        assert_eq!(arg.total_width(), 21);
    }

    #[test]
    fn extract_concatenates_first_slot_as_high_bits() {
        let arg = Arg::signed_imm([Slot::new(0, 5), Slot::new(10, 16)]);
        let word = arg.insert(0x4000_0000, 0x1a_5a5a);
        assert_eq!(word & 0x1f, 0x1a, "high five bits land in d5");
        assert_eq!((word >> 10) & 0xffff, 0x5a5a, "low sixteen bits land in k16");
        assert_eq!(word & 0xfc00_0000, 0x4000_0000, "opcode bits are preserved");
        assert_eq!(arg.extract(word), 0x1a_5a5a);
    }

    #[test]
    fn decode_sign_extends_and_postprocesses() {
        let offs = Arg::signed_imm([Slot::new(10, 14)]).with_post(PostprocessOp::ShiftLeft(2));
        let word = offs.insert(0, 0x3fff);
        assert_eq!(offs.decode(word), -4, "all-ones 14-bit field is -1, shifted by 2");

        let sa = Arg::unsigned_imm([Slot::new(15, 2)]).with_post(PostprocessOp::Add(1));
        assert_eq!(sa.decode(sa.insert(0, 3)), 4);
    }

    #[test]
    fn insert_truncates_to_total_width() {
        let arg = Arg::unsigned_imm([Slot::new(10, 5)]);
        assert_eq!(arg.insert(0, 0xffff_ffff), 0b11111 << 10);
    }
}
