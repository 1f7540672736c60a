//! Line and token helpers for raw CLI output.
//!
//! Every extractor in [`crate::facts`] is built from these pieces: output is
//! cleaned of terminal escapes, split into logical lines, and searched for
//! literal anchor words whose neighbouring tokens carry the data.

mod ansi;
mod lines;
mod locate;

pub use ansi::strip_ansi;
pub use lines::{pad_to, rows_without, split_lines, token_rows};
pub use locate::{Anchor, Tokenized, locate_all, locate_first, locate_many, tokens};
