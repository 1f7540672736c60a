//! Terminal escape stripping for raw session output.
//!
//! FastIron pads some reports with cursor-control sequences when the pager
//! is active. Extractors expect plain text, so the driver feeds every
//! command output through [`strip_ansi`] first.

use vte::{Parser, Perform};

/// Collects printable characters, tabs and newlines; drops everything else.
struct PlainText {
    out: String,
}

impl Perform for PlainText {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }

    fn execute(&mut self, byte: u8) {
        // C0 controls: only line structure survives, \r included in the drop
        if matches!(byte, b'\n' | b'\t') {
            self.out.push(byte as char);
        }
    }
}

/// Remove ANSI/VT100 escape sequences and carriage returns from `raw`.
pub fn strip_ansi(raw: &str) -> String {
    let mut parser = Parser::new();
    let mut plain = PlainText {
        out: String::with_capacity(raw.len()),
    };
    parser.advance(&mut plain, raw.as_bytes());
    plain.out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(strip_ansi("Fan 1 ok, speed (auto)"), "Fan 1 ok, speed (auto)");
    }

    #[test]
    fn test_color_codes_removed() {
        assert_eq!(strip_ansi("\x1b[32mGreen text\x1b[0m"), "Green text");
    }

    #[test]
    fn test_carriage_returns_removed() {
        assert_eq!(strip_ansi("line one\r\nline two\r\n"), "line one\nline two\n");
    }

    #[test]
    fn test_cursor_movement_removed() {
        assert_eq!(strip_ansi("\x1b[2K\x1b[1Gswitch#"), "switch#");
    }

    #[test]
    fn test_tabs_kept() {
        assert_eq!(strip_ansi("a\tb"), "a\tb");
    }
}
