//! Staged candidate configurations.
//!
//! A [`CandidateStore`] holds at most one replace candidate and one merge
//! candidate. The two slots are independent: staging one never touches the
//! other. Nothing here talks to a device; committing is left to whatever
//! owns the session.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, StagingError};
use crate::text::split_lines;

use super::block::{ConfigBlockSet, DEFAULT_DELIMITER, parse_blocks};

/// Which slot a candidate occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// Intended to fully replace the running configuration.
    Replace,
    /// Intended to be merged into the running configuration.
    Merge,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Replace => "replace",
            CandidateKind::Merge => "merge",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a candidate's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    File(PathBuf),
    Inline,
}

/// A staged configuration, kept as text and as parsed blocks.
#[derive(Debug, Clone)]
pub struct Candidate {
    kind: CandidateKind,
    source: CandidateSource,
    text: String,
    blocks: ConfigBlockSet,
}

impl Candidate {
    fn new(kind: CandidateKind, source: CandidateSource, text: String, delimiter: &str) -> Self {
        let blocks = parse_blocks(&split_lines(&text), delimiter);
        Self {
            kind,
            source,
            text,
            blocks,
        }
    }

    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    pub fn source(&self) -> &CandidateSource {
        &self.source
    }

    /// The text exactly as staged.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Non-empty lines of the staged text, right-trimmed.
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.text)
    }

    pub fn blocks(&self) -> &ConfigBlockSet {
        &self.blocks
    }
}

/// The replace and merge candidate slots.
#[derive(Debug, Clone)]
pub struct CandidateStore {
    delimiter: String,
    replace: Option<Candidate>,
    merge: Option<Candidate>,
}

impl Default for CandidateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateStore {
    /// An empty store segmenting on `!`.
    pub fn new() -> Self {
        Self::with_delimiter(DEFAULT_DELIMITER)
    }

    /// An empty store segmenting on a custom delimiter line.
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            replace: None,
            merge: None,
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    fn slot_mut(&mut self, kind: CandidateKind) -> &mut Option<Candidate> {
        match kind {
            CandidateKind::Replace => &mut self.replace,
            CandidateKind::Merge => &mut self.merge,
        }
    }

    /// Stage a candidate from a file or inline text.
    ///
    /// `path` wins when both are given. On error the slot keeps whatever it
    /// held before.
    pub fn stage(
        &mut self,
        kind: CandidateKind,
        path: Option<&Path>,
        config: Option<&str>,
    ) -> Result<&Candidate> {
        let (source, text) = match (path, config) {
            (Some(path), _) => {
                let text = fs::read_to_string(path).map_err(|source| StagingError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;
                (CandidateSource::File(path.to_path_buf()), text)
            }
            (None, Some(config)) => (CandidateSource::Inline, config.to_string()),
            (None, None) => {
                return Err(StagingError::NoInput {
                    kind: kind.as_str(),
                }
                .into());
            }
        };

        let candidate = Candidate::new(kind, source, text, &self.delimiter);
        debug!(
            "staged {kind} candidate: {} blocks from {:?}",
            candidate.blocks.len(),
            candidate.source
        );

        Ok(&*self.slot_mut(kind).insert(candidate))
    }

    /// Stage the replace candidate.
    pub fn load_replace_candidate(
        &mut self,
        path: Option<&Path>,
        config: Option<&str>,
    ) -> Result<&Candidate> {
        self.stage(CandidateKind::Replace, path, config)
    }

    /// Stage the merge candidate.
    pub fn load_merge_candidate(
        &mut self,
        path: Option<&Path>,
        config: Option<&str>,
    ) -> Result<&Candidate> {
        self.stage(CandidateKind::Merge, path, config)
    }

    pub fn get(&self, kind: CandidateKind) -> Option<&Candidate> {
        match kind {
            CandidateKind::Replace => self.replace.as_ref(),
            CandidateKind::Merge => self.merge.as_ref(),
        }
    }

    pub fn replace_candidate(&self) -> Option<&Candidate> {
        self.replace.as_ref()
    }

    pub fn merge_candidate(&self) -> Option<&Candidate> {
        self.merge.as_ref()
    }

    /// Empty one slot, returning what it held.
    pub fn clear(&mut self, kind: CandidateKind) -> Option<Candidate> {
        let old = self.slot_mut(kind).take();
        if old.is_some() {
            debug!("discarded {kind} candidate");
        }
        old
    }

    /// Empty both slots.
    pub fn clear_all(&mut self) {
        self.clear(CandidateKind::Replace);
        self.clear(CandidateKind::Merge);
    }

    pub fn is_empty(&self) -> bool {
        self.replace.is_none() && self.merge.is_none()
    }
}
