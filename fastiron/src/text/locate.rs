//! Anchor-relative token lookup.
//!
//! FastIron reports are scraped by finding a literal word and reading the
//! token a fixed distance away from it. Offsets are token deltas: `-1` is the
//! token immediately before the anchor, `1` the one immediately after.
//!
//! ```text
//! Current temperature : 36.5 deg-C (Sensor 1)
//!                       ^^^^        ^^^^^^^
//!                       offset -2   anchor
//! ```

use indexmap::IndexMap;

use crate::error::{ParseError, Result, excerpt};

/// A literal anchor word paired with the offset of the token it labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Word matched against whole whitespace-delimited tokens.
    pub word: &'static str,

    /// Token delta from the anchor to the value.
    pub offset: isize,
}

impl Anchor {
    /// Create a new anchor.
    pub const fn new(word: &'static str, offset: isize) -> Self {
        Self { word, offset }
    }
}

/// Split text into whitespace-delimited tokens, ignoring line structure.
pub fn tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Resolve the token `offset` away from `index`.
///
/// Returns `Ok(None)` when the offset reaches before the first token and an
/// error when it runs past the last one.
fn token_at<'a>(
    tokens: &[&'a str],
    index: usize,
    word: &str,
    offset: isize,
    text: &str,
) -> Result<Option<&'a str>> {
    let Some(pos) = index.checked_add_signed(offset) else {
        return Ok(None);
    };

    match tokens.get(pos) {
        Some(token) => Ok(Some(*token)),
        None => Err(ParseError::TokenOutOfRange {
            anchor: word.to_string(),
            offset,
            excerpt: excerpt(text),
        }
        .into()),
    }
}

/// Tokens of one text, for reading several offsets from the same anchor
/// occurrence.
///
/// Unlike [`locate_all`], nothing is resolved up front: a field that a
/// given occurrence does not need is never looked up, so it cannot fail.
#[derive(Debug, Clone)]
pub struct Tokenized<'a> {
    text: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Tokenized<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: tokens(text),
        }
    }

    /// Token indexes of every occurrence of `word`.
    pub fn positions(&self, word: &str) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| **token == word)
            .map(|(index, _)| index)
            .collect()
    }

    /// The token `anchor.offset` away from the occurrence at `index`.
    ///
    /// Running off either end is a [`ParseError::TokenOutOfRange`].
    pub fn at(&self, index: usize, anchor: &Anchor) -> Result<&'a str> {
        token_at(&self.tokens, index, anchor.word, anchor.offset, self.text)?.ok_or_else(|| {
            ParseError::TokenOutOfRange {
                anchor: anchor.word.to_string(),
                offset: anchor.offset,
                excerpt: excerpt(self.text),
            }
            .into()
        })
    }
}

/// Return the token at `anchor.offset` from every occurrence of `anchor.word`.
///
/// Occurrences whose offset reaches before the start of the text are
/// skipped. An occurrence whose offset runs past the end is a
/// [`ParseError::TokenOutOfRange`].
pub fn locate_all<'a>(text: &'a str, anchor: &Anchor) -> Result<Vec<&'a str>> {
    let tokens = tokens(text);
    let mut values = Vec::new();

    for (index, _) in tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| **token == anchor.word)
    {
        if let Some(value) = token_at(&tokens, index, anchor.word, anchor.offset, text)? {
            values.push(value);
        }
    }

    Ok(values)
}

/// Return the token at `anchor.offset` from the first occurrence of `anchor.word`.
///
/// Fails with [`ParseError::AnchorNotFound`] when the word is absent.
pub fn locate_first<'a>(text: &'a str, anchor: &Anchor) -> Result<&'a str> {
    let tokens = tokens(text);
    let index = tokens
        .iter()
        .position(|token| *token == anchor.word)
        .ok_or_else(|| ParseError::anchor_not_found(anchor.word, text))?;

    token_at(&tokens, index, anchor.word, anchor.offset, text)?.ok_or_else(|| {
        ParseError::TokenOutOfRange {
            anchor: anchor.word.to_string(),
            offset: anchor.offset,
            excerpt: excerpt(text),
        }
        .into()
    })
}

/// Batched lookup: one value per anchor word, from its first occurrence.
///
/// `words[i]` is paired with `offsets[i]`. Returns `Ok(None)` when the two
/// slices differ in length or are empty. Words that do not occur in the text
/// are absent from the map.
pub fn locate_many<'a>(
    text: &'a str,
    words: &[&str],
    offsets: &[isize],
) -> Result<Option<IndexMap<String, &'a str>>> {
    if words.len() != offsets.len() || words.is_empty() {
        return Ok(None);
    }

    let tokens = tokens(text);
    let mut found = IndexMap::new();

    for (word, offset) in words.iter().zip(offsets) {
        let Some(index) = tokens.iter().position(|token| token == word) else {
            continue;
        };
        if let Some(value) = token_at(&tokens, index, word, *offset, text)? {
            found.insert(word.to_string(), value);
        }
    }

    Ok(Some(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SENSOR: Anchor = Anchor::new("(Sensor", -2);

    #[test]
    fn test_locate_all_before_anchor() {
        let text = "Current temperature : 36.5 deg-C (Sensor 1), 41.0 deg-C (Sensor 2)";
        assert_eq!(locate_all(text, &SENSOR).unwrap(), vec!["36.5", "41.0"]);
    }

    #[test]
    fn test_locate_all_after_anchor() {
        let anchor = Anchor::new("Fan", 1);
        let text = "Fan 1 ok, speed (auto)\nFan 2 failed";
        assert_eq!(locate_all(text, &anchor).unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_locate_all_whole_tokens_only() {
        let anchor = Anchor::new("Fan", 1);
        let text = "Fanless unit\nFan controlled temperature";
        assert_eq!(locate_all(text, &anchor).unwrap(), vec!["controlled"]);
    }

    #[test]
    fn test_locate_all_skips_underflow() {
        let text = "(Sensor 1) 10.0 deg-C (Sensor 2)";
        assert_eq!(locate_all(text, &SENSOR).unwrap(), vec!["10.0"]);
    }

    #[test]
    fn test_locate_all_overflow_is_error() {
        let anchor = Anchor::new("Warning", 2);
        let err = locate_all("Warning level", &anchor).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::TokenOutOfRange { offset: 2, .. })
        ));
    }

    #[test]
    fn test_locate_all_missing_anchor() {
        assert!(locate_all("nothing here", &SENSOR).unwrap().is_empty());
    }

    #[test]
    fn test_locate_first() {
        let anchor = Anchor::new("hostname", 1);
        let text = "ver 08.0.30\nhostname core-sw1\nhostname other";
        assert_eq!(locate_first(text, &anchor).unwrap(), "core-sw1");
    }

    #[test]
    fn test_locate_first_missing() {
        let anchor = Anchor::new("Stackable", 1);
        let err = locate_first("HW: ICX7250", &anchor).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::AnchorNotFound { .. })));
    }

    #[test]
    fn test_locate_many() {
        let text = "3 day(s) 4 hour(s) 5 minute(s)";
        let found = locate_many(text, &["day(s)", "minute(s)", "second(s)"], &[-1, -1, -1])
            .unwrap()
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found["day(s)"], "3");
        assert_eq!(found["minute(s)"], "5");
        assert!(!found.contains_key("second(s)"));
    }

    #[test]
    fn test_locate_many_first_occurrence() {
        let text = "a 1 b a 2";
        let found = locate_many(text, &["a"], &[1]).unwrap().unwrap();
        assert_eq!(found["a"], "1");
    }

    #[test]
    fn test_locate_many_mismatched_or_empty() {
        assert!(locate_many("a b", &["a"], &[1, 2]).unwrap().is_none());
        assert!(locate_many("a b", &[], &[]).unwrap().is_none());
    }

    #[test]
    fn test_tokenized_resolves_per_occurrence() {
        let power = Anchor::new("Power", 2);
        let status = Anchor::new("Power", 5);
        let text = "Power supply 1 detected, status failed\nPower supply 2";
        let tokenized = Tokenized::new(text);

        let positions = tokenized.positions("Power");
        assert_eq!(positions, vec![0, 6]);
        assert_eq!(tokenized.at(positions[0], &status).unwrap(), "failed");
        assert_eq!(tokenized.at(positions[1], &power).unwrap(), "2");

        let err = tokenized.at(positions[1], &status).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::TokenOutOfRange { offset: 5, .. })
        ));
        assert!(tokenized.at(0, &Anchor::new("Power", -1)).is_err());
    }
}
