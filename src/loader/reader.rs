//! Reads instruction description files line by line into [`InsnDescription`] records.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::error::LoadError;
use crate::isa::description::InsnDescription;
use crate::isa::error::ParseError;
use crate::isa::parser::parse_description_line;

#[derive(Clone, Copy, Debug, Default)]
pub struct LoaderOptions {
    /// Also require each `orig_fmt` to validate in manual-syntax mode over the same bits.
    pub strict_orig_format: bool,
}

#[derive(Debug, Default)]
pub struct DescriptionLoader {
    options: LoaderOptions,
}

impl DescriptionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Parses every non-empty line of `src`; the first bad line aborts the load.
    pub fn parse_str(&self, src: &str) -> Result<Vec<InsnDescription>, LoadError> {
        self.parse_source(None, src)
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<InsnDescription>, LoadError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let descs = self.parse_source(Some(path), &src)?;
        debug!(path = %path.display(), count = descs.len(), "loaded insn descriptions");
        Ok(descs)
    }

    /// Loads each file in order and concatenates the results.
    pub fn load_files<I, P>(&self, paths: I) -> Result<Vec<InsnDescription>, LoadError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut descs = Vec::new();
        for path in paths {
            descs.extend(self.load_file(path)?);
        }
        Ok(descs)
    }

    fn parse_source(
        &self,
        path: Option<&Path>,
        src: &str,
    ) -> Result<Vec<InsnDescription>, LoadError> {
        let mut descs = Vec::new();
        for (idx, text) in src.lines().enumerate() {
            if text.is_empty() {
                continue;
            }
            let line = idx + 1;
            let desc = self
                .parse_line(text)
                .map_err(|source| LoadError::Line {
                    path: path.map(PathBuf::from),
                    line,
                    text: text.to_string(),
                    source,
                })?;
            trace!(line, mnemonic = %desc.mnemonic, word = desc.word, "parsed insn description");
            descs.push(desc);
        }
        Ok(descs)
    }

    fn parse_line(&self, text: &str) -> Result<InsnDescription, ParseError> {
        let desc = parse_description_line(text)?;
        if self.options.strict_orig_format {
            desc.validate_orig_format()?;
        }
        Ok(desc)
    }
}

/// Parses a whole description text with default options.
pub fn parse_descriptions(src: &str) -> Result<Vec<InsnDescription>, LoadError> {
    DescriptionLoader::new().parse_str(src)
}
