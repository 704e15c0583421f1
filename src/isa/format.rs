//! Ordered operand lists describing every variable field of one instruction encoding.

use std::fmt;

use super::arg::Arg;
use super::error::ValidationError;

/// Canonical representation of a format without any operand fields.
pub const EMPTY_FORMAT: &str = "EMPTY";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InsnFormat {
    pub args: Vec<Arg>,
}

impl InsnFormat {
    pub fn new(args: Vec<Arg>) -> Self {
        Self { args }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Validates with register args required to precede every immediate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(false)
    }

    /// Validates hand-authored operand orders, where registers and immediates may interleave.
    pub fn validate_manual_syntax(&self) -> Result<(), ValidationError> {
        self.validate_with(true)
    }

    fn validate_with(&self, manual_syntax: bool) -> Result<(), ValidationError> {
        let mut seen_args_mask = 0u32;
        let mut in_imm_region = false;
        for arg in &self.args {
            arg.validate()?;

            let mask = arg.bitmask();
            if mask & seen_args_mask != 0 {
                return Err(ValidationError::OverlappingArgs {
                    arg: arg.to_string(),
                });
            }
            seen_args_mask |= mask;

            if manual_syntax {
                continue;
            }
            if arg.kind.is_imm() {
                in_imm_region = true;
            } else if in_imm_region {
                return Err(ValidationError::RegisterAfterImmediate {
                    arg: arg.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn canonical_repr(&self) -> String {
        if self.args.is_empty() {
            return EMPTY_FORMAT.to_string();
        }
        let mut out = String::new();
        for arg in &self.args {
            arg.write_canonical(&mut out);
        }
        out
    }

    pub fn args_bitmask(&self) -> u32 {
        self.args.iter().fold(0, |mask, arg| mask | arg.bitmask())
    }

    /// Fixed opcode bits: everything no operand claims.
    pub fn match_bitmask(&self) -> u32 {
        !self.args_bitmask()
    }

    /// Scatters one raw value per arg into `base`.
    pub fn encode(&self, base: u32, operands: &[u32]) -> Result<u32, ValidationError> {
        if operands.len() != self.args.len() {
            return Err(ValidationError::OperandCountMismatch {
                expected: self.args.len(),
                found: operands.len(),
            });
        }
        Ok(self
            .args
            .iter()
            .zip(operands)
            .fold(base, |word, (arg, value)| arg.insert(word, *value)))
    }
}

impl fmt::Display for InsnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validate().is_err() {
            return write!(f, "<invalid InsnFormat {:?}>", self.args);
        }
        write!(f, "<InsnFormat {}>", self.canonical_repr())
    }
}
