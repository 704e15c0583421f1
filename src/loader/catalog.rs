//! Distinct operand formats across a set of descriptions, keyed by canonical representation.

use std::collections::BTreeMap;

use crate::isa::description::InsnDescription;
use crate::isa::format::InsnFormat;

#[derive(Debug, Clone, Copy)]
pub struct FormatEntry<'a> {
    /// First format seen with this canonical representation.
    pub format: &'a InsnFormat,
    pub uses: usize,
}

#[derive(Debug, Default)]
pub struct FormatCatalog<'a> {
    entries: BTreeMap<String, FormatEntry<'a>>,
}

impl<'a> FormatCatalog<'a> {
    pub fn gather(descs: &'a [InsnDescription]) -> Self {
        let mut entries: BTreeMap<String, FormatEntry<'a>> = BTreeMap::new();
        for desc in descs {
            entries
                .entry(desc.format.canonical_repr())
                .and_modify(|entry| entry.uses += 1)
                .or_insert(FormatEntry {
                    format: &desc.format,
                    uses: 1,
                });
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, canonical: &str) -> Option<&FormatEntry<'a>> {
        self.entries.get(canonical)
    }

    /// Entries in ascending canonical-representation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormatEntry<'a>)> {
        self.entries.iter().map(|(repr, entry)| (repr.as_str(), entry))
    }
}

/// Orders descriptions by their fixed opcode word; equal words keep their input order.
pub fn sort_by_word(descs: &mut [InsnDescription]) {
    descs.sort_by_key(|desc| desc.word);
}
