//! Block-aware configuration diff.
//!
//! Diffing is done one block at a time. A target block that appears
//! verbatim in the base produces nothing. A target block whose header also
//! heads one or more base blocks produces the header unmarked, followed by
//! each body line none of those base blocks has. Any other target block is emitted whole, every
//! line marked.
//!
//! Running the diff in both directions and combining the two edit lists
//! gives the unified text that [`compare`] returns:
//!
//! ```text
//! interface ethernet 1/1/1
//! -  port-name old
//! +  port-name new
//! + vlan 30 name voice by port
//! +  tagged ethe 1/1/2
//! - vlan 20 name guests by port
//! -  untagged ethe 1/1/5
//! ```

use std::fmt;

use log::debug;

use super::block::{ConfigBlock, ConfigBlockSet};

/// Symbol for lines the target adds.
pub const ADDED: &str = "+";
/// Symbol for lines the target removes.
pub const REMOVED: &str = "-";

/// Groups of a single line carry no change and are dropped.
const MIN_GROUP_LEN: usize = 2;

/// One line of diff output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// An unmarked line, only ever a block header giving context.
    Kept(String),
    /// A line carrying a change symbol.
    Marked { symbol: String, line: String },
}

impl Edit {
    fn marked(symbol: &str, line: &str) -> Self {
        Edit::Marked {
            symbol: symbol.to_string(),
            line: line.to_string(),
        }
    }

    /// The configuration line without any symbol.
    pub fn line(&self) -> &str {
        match self {
            Edit::Kept(line) => line,
            Edit::Marked { line, .. } => line,
        }
    }

    /// Whether the line carries a change symbol.
    pub fn is_marked(&self) -> bool {
        matches!(self, Edit::Marked { .. })
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Kept(line) => f.write_str(line),
            Edit::Marked { symbol, line } => write!(f, "{symbol} {line}"),
        }
    }
}

/// The edits produced for one target block.
///
/// The first edit is the anchor: a kept header when the base has a block
/// with the same header, otherwise the marked header of a wholly new block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditGroup {
    edits: Vec<Edit>,
}

impl EditGroup {
    /// The first edit of the group.
    pub fn anchor(&self) -> &Edit {
        &self.edits[0]
    }

    /// Edits after the anchor.
    pub fn body(&self) -> &[Edit] {
        &self.edits[1..]
    }

    /// All edits, anchor first.
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Always `false`; groups keep at least their anchor.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Edits that turn `base` into `target`, with changed lines marked by
/// `symbol`.
///
/// When `base` repeats a header, a target body line is unchanged if any of
/// the blocks under that header contains it.
pub fn diff(base: &ConfigBlockSet, target: &ConfigBlockSet, symbol: &str) -> Vec<EditGroup> {
    let mut groups = Vec::new();

    for block in target {
        if base.contains_block(block) {
            continue;
        }

        let counterparts: Vec<&ConfigBlock> = base.with_header(block.header()).collect();
        let edits: Vec<Edit> = if counterparts.is_empty() {
            block
                .lines()
                .iter()
                .map(|line| Edit::marked(symbol, line))
                .collect()
        } else {
            std::iter::once(Edit::Kept(block.header().to_string()))
                .chain(
                    block
                        .body()
                        .iter()
                        .filter(|line| !counterparts.iter().any(|c| c.contains(line)))
                        .map(|line| Edit::marked(symbol, line)),
                )
                .collect()
        };

        if edits.len() >= MIN_GROUP_LEN {
            groups.push(EditGroup { edits });
        }
    }

    debug!(
        "diff '{symbol}': {} of {} target blocks changed",
        groups.len(),
        target.len()
    );
    groups
}

fn push_line(out: &mut String, edit: &Edit) {
    out.push_str(&edit.to_string());
    out.push('\n');
}

/// Render forward groups, pulling in the body of any reverse group that
/// shares an anchor.
///
/// For each forward group the anchor line comes first, then the reverse
/// group's removed lines, then the forward group's added lines. Every line
/// ends with a newline.
pub fn compose_merge(forward: &[EditGroup], reverse: &[EditGroup]) -> String {
    let mut out = String::new();

    for group in forward {
        push_line(&mut out, group.anchor());
        for counterpart in reverse.iter().filter(|r| r.anchor() == group.anchor()) {
            for edit in counterpart.body() {
                push_line(&mut out, edit);
            }
        }
        for edit in group.body() {
            push_line(&mut out, edit);
        }
    }

    out
}

/// Render the reverse groups whose anchor matches no forward group.
///
/// These are removals with no corresponding addition, so they were not
/// rendered by [`compose_merge`].
pub fn compose_vice(reverse: &[EditGroup], forward: &[EditGroup]) -> String {
    let mut out = String::new();

    for group in reverse {
        if forward.iter().any(|f| f.anchor() == group.anchor()) {
            continue;
        }
        for edit in group.edits() {
            push_line(&mut out, edit);
        }
    }

    out
}

/// Full unified diff from `running` to `candidate`.
pub fn compare(running: &ConfigBlockSet, candidate: &ConfigBlockSet) -> String {
    let forward = diff(running, candidate, ADDED);
    let reverse = diff(candidate, running, REMOVED);

    let mut out = compose_merge(&forward, &reverse);
    out.push_str(&compose_vice(&reverse, &forward));
    out
}

/// Only the lines `candidate` would add on top of `running`.
pub fn additions(running: &ConfigBlockSet, candidate: &ConfigBlockSet) -> String {
    compose_merge(&diff(running, candidate, ADDED), &[])
}
