//! Parser for instruction description lines:
//!
//! ```text
//! <8 lowercase hex digits> <mnemonic> <spaces> <format> [<spaces>]@key[=value] ...
//! ```
//!
//! The fixed fields are scanned first, then the remainder is read as a run of attribute tokens.

use super::description::{Attributes, FLAG_VALUE, InsnDescription};
use super::error::ParseError;
use super::format::EMPTY_FORMAT;
use super::lexer::parse_insn_format;

/// Attribute whose value is an alternate, assembly-syntax format string.
pub const ORIG_FMT_KEY: &str = "orig_fmt";

const FORMAT_CHARS: &[u8] = b"DJKACFVXSUdjkamn";
const WORD_DIGITS: usize = 8;

/// Byte cursor over one line. Every character class it matches is ASCII, so slices taken
/// between matches always fall on char boundaries.
struct LineScanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> LineScanner<'a> {
    fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    fn peek(&self) -> Option<u8> {
        self.line.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, text: &str) -> bool {
        if self.line[self.pos..].starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.line[start..self.pos]
    }
}

struct LineFields<'a> {
    word: &'a str,
    mnemonic: &'a str,
    format: &'a str,
    attribs: Vec<(&'a str, Option<&'a str>)>,
}

pub fn parse_description_line(line: &str) -> Result<InsnDescription, ParseError> {
    let fields = scan_line(line)?;

    let word = u32::from_str_radix(fields.word, 16).map_err(|_| ParseError::MalformedLine {
        reason: "insn word is not a 32-bit hex value",
    })?;

    let format = parse_insn_format(fields.format)?;

    let mut attribs = Attributes::default();
    for (key, value) in fields.attribs {
        attribs.insert(key.to_string(), value.unwrap_or(FLAG_VALUE).to_string());
    }

    let orig_format = match attribs.remove(ORIG_FMT_KEY) {
        Some(value) => Some(parse_insn_format(&value).map_err(|err| {
            ParseError::MalformedAttribute {
                key: ORIG_FMT_KEY.to_string(),
                source: Box::new(err),
            }
        })?),
        None => None,
    };

    let desc = InsnDescription {
        word,
        mnemonic: fields.mnemonic.to_string(),
        format,
        orig_format,
        attribs,
    };
    desc.validate()?;
    Ok(desc)
}

fn scan_line(line: &str) -> Result<LineFields<'_>, ParseError> {
    let malformed = |reason| ParseError::MalformedLine { reason };
    let mut scanner = LineScanner::new(line);

    let word = scanner.take_while(is_word_digit);
    if word.len() != WORD_DIGITS {
        return Err(malformed("expected 8 lowercase hex digits"));
    }
    if !scanner.eat(b' ') {
        return Err(malformed("expected a single space after insn word"));
    }

    if !scanner.peek().is_some_and(|b| b.is_ascii_lowercase()) {
        return Err(malformed("mnemonic must start with a lowercase letter"));
    }
    let mnemonic = scanner.take_while(is_mnemonic_char);

    if scanner.take_while(|b| b == b' ').is_empty() {
        return Err(malformed("expected spaces after mnemonic"));
    }

    let format = if scanner.eat_str(EMPTY_FORMAT) {
        EMPTY_FORMAT
    } else {
        scanner.take_while(|b| b.is_ascii_digit() || FORMAT_CHARS.contains(&b))
    };
    if format.is_empty() {
        return Err(malformed("expected insn format"));
    }

    let mut attribs = Vec::new();
    loop {
        let spaces = scanner.take_while(|b| b == b' ');
        if scanner.at_end() {
            if !spaces.is_empty() {
                return Err(malformed("trailing spaces"));
            }
            break;
        }
        if !scanner.eat(b'@') {
            return Err(malformed("expected '@' to start an attribute"));
        }
        let key = scanner.take_while(is_attrib_char);
        if key.is_empty() {
            return Err(malformed("attribute key is empty"));
        }
        let value = if scanner.eat(b'=') {
            Some(scanner.take_while(is_attrib_char))
        } else {
            None
        };
        attribs.push((key, value));
    }

    Ok(LineFields {
        word,
        mnemonic,
        format,
        attribs,
    })
}

fn is_word_digit(b: u8) -> bool {
    b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
}

fn is_mnemonic_char(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'.'
}

fn is_attrib_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}
