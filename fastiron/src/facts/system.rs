//! Identity facts from `show version` and the running configuration.
//!
//! # Output Examples
//!
//! ```text
//!   HW: Stackable ICX7250-24P
//!   SW: Version 08.0.30bT211 Copyright (c) Ruckus Networks, Inc.
//!   Serial  #:BCW2222K00Y
//!   The system uptime is 3 day(s) 4 hour(s) 5 minute(s) 6 second(s)
//! ```

use crate::error::{ParseError, Result};
use crate::text::{Anchor, locate_all, locate_first, locate_many};

use super::parse_number;

/// Uptime unit anchors and their length in seconds.
const UPTIME_UNITS: [(&str, u64); 4] = [
    ("day(s)", 86_400),
    ("hour(s)", 3_600),
    ("minute(s)", 60),
    ("second(s)", 1),
];

/// The count sits immediately before each unit word.
const UPTIME_VALUE_OFFSET: isize = -1;

const MODEL: Anchor = Anchor::new("Stackable", 1);
const HOSTNAME: Anchor = Anchor::new("hostname", 1);
const OS_VERSION: Anchor = Anchor::new("SW:", 2);
const SERIAL: Anchor = Anchor::new("Serial", 1);

/// Prefix glued to the serial number token.
const SERIAL_PREFIX: &str = "#:";

/// Total seconds described by `N day(s) N hour(s) N minute(s) N second(s)`.
///
/// Units that do not appear contribute nothing, so text without any unit
/// word yields `0`.
pub fn uptime(text: &str) -> Result<u64> {
    let words: Vec<&str> = UPTIME_UNITS.iter().map(|(word, _)| *word).collect();
    let offsets = [UPTIME_VALUE_OFFSET; UPTIME_UNITS.len()];

    let Some(found) = locate_many(text, &words, &offsets)? else {
        return Ok(0);
    };

    let mut total: u64 = 0;
    for (word, seconds) in UPTIME_UNITS {
        if let Some(count) = found.get(word) {
            total = parse_number::<u64>(word, count)?
                .checked_mul(seconds)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| ParseError::invalid_number(word, count))?;
        }
    }
    Ok(total)
}

/// Switch model, the token after `Stackable`.
pub fn model(text: &str) -> Result<String> {
    Ok(locate_first(text, &MODEL)?.to_string())
}

/// Configured hostname, or `None` when the configuration sets none.
pub fn hostname(text: &str) -> Result<Option<String>> {
    Ok(locate_all(text, &HOSTNAME)?
        .first()
        .map(|name| name.to_string()))
}

/// Software version, two tokens after `SW:`.
pub fn os_version(text: &str) -> Result<String> {
    Ok(locate_first(text, &OS_VERSION)?.to_string())
}

/// Chassis serial number.
pub fn serial_number(text: &str) -> Result<String> {
    let token = locate_first(text, &SERIAL)?;
    Ok(token.replace(SERIAL_PREFIX, ""))
}
