//! One instruction's full record: fixed opcode bits, mnemonic, operand formats, attributes.

use ahash::AHashMap;

use super::error::ValidationError;
use super::format::InsnFormat;

pub type Attributes = AHashMap<String, String>;

/// Value stored for attributes written without `=value`.
pub const FLAG_VALUE: &str = "true";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsnDescription {
    /// Opcode pattern with every operand bit zeroed.
    pub word: u32,
    pub mnemonic: String,
    pub format: InsnFormat,
    /// Assembly-syntax operand order and transforms, when they differ from `format`.
    pub orig_format: Option<InsnFormat>,
    pub attribs: Attributes,
}

impl InsnDescription {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mnemonic.is_empty() {
            return Err(ValidationError::EmptyMnemonic);
        }

        self.format.validate()?;

        let args_bitmask = self.format.args_bitmask();
        if self.word & args_bitmask != 0 {
            return Err(ValidationError::WordOverlapsArgs {
                word: self.word,
                args_bitmask,
            });
        }

        Ok(())
    }

    /// Checks `orig_format` in manual-syntax mode; it must claim exactly the bits `format` does.
    pub fn validate_orig_format(&self) -> Result<(), ValidationError> {
        let Some(orig) = &self.orig_format else {
            return Ok(());
        };
        orig.validate_manual_syntax()?;

        let format_bitmask = self.format.args_bitmask();
        let orig_bitmask = orig.args_bitmask();
        if format_bitmask != orig_bitmask {
            return Err(ValidationError::OrigFormatBitsDiffer {
                format_bitmask,
                orig_bitmask,
            });
        }
        Ok(())
    }

    /// Whether `word` is an encoding of this instruction.
    pub fn matches(&self, word: u32) -> bool {
        word & self.format.match_bitmask() == self.word
    }

    pub fn encode(&self, operands: &[u32]) -> Result<u32, ValidationError> {
        self.format.encode(self.word, operands)
    }

    pub fn attrib(&self, key: &str) -> Option<&str> {
        self.attribs.get(key).map(String::as_str)
    }

    /// True for bare `@key` attributes.
    pub fn has_flag(&self, key: &str) -> bool {
        self.attrib(key) == Some(FLAG_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::arg::{Arg, ArgKind, PostprocessOp};
    use crate::isa::slot::Slot;

    fn ll_w() -> InsnDescription {
        InsnDescription {
            word: 0x2000_0000,
            mnemonic: "ll.w".into(),
            format: InsnFormat::new(vec![
                Arg::register(ArgKind::IntReg, 0),
                Arg::register(ArgKind::IntReg, 5),
                Arg::signed_imm([Slot::new(10, 14)]),
            ]),
            orig_format: None,
            attribs: Attributes::default(),
        }
    }

    #[test]
    fn word_bits_must_avoid_operand_slots() {
        let mut desc = ll_w();
        desc.validate().expect("opcode bits sit above bit 24");

        desc.word |= 1 << 12;
        assert!(matches!(
            desc.validate(),
            Err(ValidationError::WordOverlapsArgs { .. })
        ));
    }

    #[test]
    fn empty_mnemonic_is_rejected() {
        let mut desc = ll_w();
        desc.mnemonic.clear();
        assert_eq!(desc.validate(), Err(ValidationError::EmptyMnemonic));
    }

    #[test]
    fn matches_ignores_operand_bits() {
        let desc = ll_w();
        assert!(desc.matches(0x2000_0000));
        assert!(desc.matches(0x20ff_ffff), "operand bits are don't-care");
        assert!(!desc.matches(0x2100_0000), "opcode bits must agree");
    }

    #[test]
    fn orig_format_must_cover_same_bits() {
        let mut desc = ll_w();
        let mut orig = desc.format.clone();
        orig.args[2] = orig.args[2].clone().with_post(PostprocessOp::ShiftLeft(2));
        desc.orig_format = Some(orig);
        desc.validate_orig_format().expect("shifted imm covers the same slot");

        let narrower = InsnFormat::new(vec![
            Arg::register(ArgKind::IntReg, 0),
            Arg::signed_imm([Slot::new(10, 14)]),
        ]);
        desc.orig_format = Some(narrower);
        assert!(matches!(
            desc.validate_orig_format(),
            Err(ValidationError::OrigFormatBitsDiffer { .. })
        ));
    }

    #[test]
    fn flags_read_back_as_true() {
        let mut desc = ll_w();
        desc.attribs.insert("atomics".into(), FLAG_VALUE.into());
        desc.attribs.insert("orig_name".into(), "alsl.d".into());
        assert!(desc.has_flag("atomics"));
        assert!(!desc.has_flag("orig_name"));
        assert_eq!(desc.attrib("orig_name"), Some("alsl.d"));
    }
}
