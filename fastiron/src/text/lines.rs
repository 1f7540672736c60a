//! Logical line splitting.

use memchr::memchr_iter;

/// Split raw output into its non-empty logical lines.
///
/// Runs of newlines collapse to a single boundary, `\r` and trailing blanks
/// are trimmed, and the final line is kept even without a trailing newline.
/// Leading indentation is preserved so configuration body lines can be
/// re-emitted unchanged.
///
/// Splitting `split_lines(text).join("\n")` again yields the same lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for end in memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len())) {
        let line = text[start..end].trim_end();
        if !line.is_empty() {
            lines.push(line);
        }
        start = end + 1;
    }

    lines
}

/// Split output into lines, then each line into its whitespace tokens.
pub fn token_rows(text: &str) -> Vec<Vec<&str>> {
    split_lines(text)
        .into_iter()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect()
}

/// Tokenise every line that does not contain `word`.
///
/// Used to drop report header rows (e.g. the `Port` header of
/// `show interfaces brief`) before reading columns.
pub fn rows_without<'a>(lines: &[&'a str], word: &str) -> Vec<Vec<&'a str>> {
    lines
        .iter()
        .filter(|line| !line.contains(word))
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect()
}

/// Pad a per-port column with `filler` until it holds `size` entries.
///
/// Columns longer than `size` are left untouched.
pub fn pad_to<T: Clone>(mut values: Vec<T>, size: usize, filler: T) -> Vec<T> {
    if values.len() < size {
        values.resize(size, filler);
    }
    values
}
