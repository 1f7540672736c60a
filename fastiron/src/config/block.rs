//! Segmentation of flat configuration text into command blocks.
//!
//! FastIron prints its running configuration as one command per line with
//! blocks separated by a line holding only `!`:
//!
//! ```text
//! ver 08.0.30bT211
//! !
//! vlan 10 name users by port
//!  tagged ethe 1/1/1
//! !
//! interface ethernet 1/1/1
//!  port-name uplink
//! !
//! ```
//!
//! Lines before the first delimiter (here `ver ...`) never belong to a
//! block.

use std::slice;

use crate::text::split_lines;

/// Delimiter line of the FastIron configuration dialect.
pub const DEFAULT_DELIMITER: &str = "!";

/// A header command and the body lines subordinate to it.
///
/// Always holds at least the header line. Two blocks are "the same block"
/// for diffing when their headers are equal; they may still differ in body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    lines: Vec<String>,
}

impl ConfigBlock {
    /// Build a block from its lines, or `None` if there are none.
    pub fn new(lines: Vec<String>) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self { lines })
        }
    }

    /// The first line, used as the block's identity.
    pub fn header(&self) -> &str {
        &self.lines[0]
    }

    /// Lines after the header.
    pub fn body(&self) -> &[String] {
        &self.lines[1..]
    }

    /// All lines, header first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any line of the block (header included) equals `line`.
    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    /// Number of lines, header included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`; blocks hold at least their header.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The blocks of one configuration text, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigBlockSet {
    blocks: Vec<ConfigBlock>,
}

impl ConfigBlockSet {
    /// Split `text` into lines and segment them on `delimiter`.
    pub fn from_text(text: &str, delimiter: &str) -> Self {
        parse_blocks(&split_lines(text), delimiter)
    }

    /// The blocks, in source order.
    pub fn blocks(&self) -> &[ConfigBlock] {
        &self.blocks
    }

    /// Iterate over the blocks.
    pub fn iter(&self) -> slice::Iter<'_, ConfigBlock> {
        self.blocks.iter()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of lines across all blocks.
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(ConfigBlock::len).sum()
    }

    /// Whether an identical block (same lines, same order) is present.
    pub fn contains_block(&self, block: &ConfigBlock) -> bool {
        self.blocks.contains(block)
    }

    /// First block whose header equals `header`.
    pub fn find_header(&self, header: &str) -> Option<&ConfigBlock> {
        self.blocks.iter().find(|b| b.header() == header)
    }

    /// Every block whose header equals `header`, in source order.
    pub fn with_header<'a>(
        &'a self,
        header: &'a str,
    ) -> impl Iterator<Item = &'a ConfigBlock> + 'a {
        self.blocks.iter().filter(move |b| b.header() == header)
    }
}

impl<'a> IntoIterator for &'a ConfigBlockSet {
    type Item = &'a ConfigBlock;
    type IntoIter = slice::Iter<'a, ConfigBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Segment configuration lines into blocks.
///
/// A block starts right after a `delimiter` line and runs until the next
/// delimiter or the end of input. Lines before the first delimiter are not
/// part of any block, and back-to-back delimiters produce no block.
pub fn parse_blocks(lines: &[&str], delimiter: &str) -> ConfigBlockSet {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<String>> = None;

    for line in lines {
        if *line == delimiter {
            if let Some(block) = current.take().and_then(ConfigBlock::new) {
                blocks.push(block);
            }
            current = Some(Vec::new());
        } else if let Some(block) = current.as_mut() {
            block.push(line.to_string());
        }
    }

    if let Some(block) = current.and_then(ConfigBlock::new) {
        blocks.push(block);
    }

    ConfigBlockSet { blocks }
}
