//! Interface inventory, speed and status extraction.
//!
//! # Output Examples
//!
//! ```text
//! Port       Link    State   Dupl Speed Trunk Tag Pvid Pri MAC             Name
//! 1/1/1      Up      Forward Full 1G    None  No  1    0   cc4e.24b4.1f5c  uplink
//! 1/1/2      Down    None    None None  None  No  1    0   cc4e.24b4.1f5d
//! ve10       Up      N/A     N/A  N/A   N/A   N/A N/A  N/A cc4e.24b4.1f5c
//! ```

use indexmap::IndexMap;
use log::trace;
use serde::Serialize;

use crate::error::{Result, UnrecognizedValueError};
use crate::text::{Anchor, locate_all, pad_to, rows_without, split_lines};

use super::system::uptime;

/// Header word of `show interfaces brief`.
pub const BRIEF_HEADER: &str = "Port";

/// Name fragments marking virtual, loopback and tunnel interfaces.
///
/// Matched as substrings of the interface name, not by interface type.
const VIRTUAL_MARKERS: [&str; 3] = ["ve", "lb", "tunnel"];

/// Column of the link state in `show interfaces brief`.
const LINK_COLUMN: usize = 1;

/// Column of the MAC address in `show interfaces brief`.
const MAC_COLUMN: usize = 9;

/// Configured speed token in `Configured speed auto, actual 1Gbit, ...`.
pub const SPEED: Anchor = Anchor::new("speed", 1);

const NO_PORT_NAME: &str = "No port name";
const PORT_NAME_PREFIX: &str = "Port name is";

/// Lines of the port-time report to skip.
const PORT_TIME_SKIP: &str = "name";

/// Interface facts for one port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interface {
    pub is_up: bool,
    pub is_enabled: bool,
    pub description: String,
    /// Seconds since the link last changed state.
    pub last_flapping: f64,
    /// Speed in megabits.
    pub speed: u32,
    pub mac_address: String,
}

/// One row of `show interfaces brief`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortStatus {
    pub name: String,
    /// Link column as printed (`Up`, `Down`, `Disable`, ...).
    pub link: String,
    pub mac_address: String,
}

impl PortStatus {
    /// Whether the link is up.
    pub fn is_up(&self) -> bool {
        self.link == "Up"
    }

    /// Whether the port is administratively enabled.
    pub fn is_enabled(&self) -> bool {
        !self.link.starts_with("Disable")
    }
}

/// Whether `name` looks like a front-panel port rather than a virtual,
/// loopback or tunnel interface.
pub fn is_physical(name: &str) -> bool {
    !VIRTUAL_MARKERS.iter().any(|marker| name.contains(marker))
}

/// First column of every row not containing `header_word`.
///
/// With `physical_only`, names containing `ve`, `lb` or `tunnel` are left out.
pub fn interface_list(text: &str, header_word: &str, physical_only: bool) -> Vec<String> {
    let lines = split_lines(text);

    rows_without(&lines, header_word)
        .into_iter()
        .map(|row| row[0])
        .filter(|name| !physical_only || is_physical(name))
        .map(str::to_string)
        .collect()
}

/// Parse each data row of `show interfaces brief`.
pub fn port_status(text: &str) -> Vec<PortStatus> {
    let lines = split_lines(text);

    rows_without(&lines, BRIEF_HEADER)
        .into_iter()
        .map(|row| PortStatus {
            name: row[0].to_string(),
            link: row.get(LINK_COLUMN).copied().unwrap_or_default().to_string(),
            mac_address: row.get(MAC_COLUMN).copied().unwrap_or_default().to_string(),
        })
        .collect()
}

/// Decode one vendor speed token into megabits.
///
/// The set of tokens is closed: anything else is an
/// [`UnrecognizedValueError`], never a default.
pub fn decode_speed(token: &str) -> std::result::Result<u32, UnrecognizedValueError> {
    match token {
        "auto," | "1Gbit," => Ok(1_000),
        "10Mbit," => Ok(10),
        "100Mbit," => Ok(100),
        "2.5Gbit," => Ok(2_500),
        "5Gbit," => Ok(5_000),
        "10Gbit," => Ok(10_000),
        "40Gbit," => Ok(40_000),
        "100Gbit," => Ok(100_000),
        other => Err(UnrecognizedValueError {
            kind: "interface speed",
            value: other.to_string(),
        }),
    }
}

/// Decode a sequence of speed tokens, failing on the first unknown one.
pub fn interface_speed_codes(tokens: &[&str]) -> Result<Vec<u32>> {
    Ok(tokens
        .iter()
        .map(|token| decode_speed(token))
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Speed of every port in `show interfaces | include speed` output.
pub fn interface_speeds(text: &str) -> Result<Vec<u32>> {
    interface_speed_codes(&locate_all(text, &SPEED)?)
}

/// Port descriptions, one per line, padded with empty names to `size`.
pub fn port_names(text: &str, size: usize) -> Vec<String> {
    let names: Vec<String> = split_lines(text)
        .into_iter()
        .map(|line| {
            if line.contains(NO_PORT_NAME) {
                String::new()
            } else {
                line.replace(PORT_NAME_PREFIX, "").trim().to_string()
            }
        })
        .collect();

    pad_to(names, size, String::new())
}

/// Per-port seconds in the current link state.
pub fn port_uptimes(text: &str) -> Result<Vec<u64>> {
    split_lines(text)
        .into_iter()
        .filter(|line| !line.contains(PORT_TIME_SKIP))
        .map(|line| {
            trace!("port time line: {line}");
            uptime(line)
        })
        .collect()
}

/// Join the four interface reports into per-port facts, keyed by port name.
///
/// Only physical ports are reported. The speed, description and uptime
/// reports list ports in the same order as `show interfaces brief`; columns
/// shorter than the port list are padded (speed `0`, empty description,
/// uptime `0`).
pub fn interfaces(
    brief: &str,
    speed_text: &str,
    name_text: &str,
    uptime_text: &str,
) -> Result<IndexMap<String, Interface>> {
    let ports: Vec<PortStatus> = port_status(brief)
        .into_iter()
        .filter(|port| is_physical(&port.name))
        .collect();
    let size = ports.len();

    let speeds = pad_to(interface_speeds(speed_text)?, size, 0);
    let names = port_names(name_text, size);
    let uptimes = pad_to(port_uptimes(uptime_text)?, size, 0);

    let mut interfaces = IndexMap::with_capacity(size);
    let columns = ports.into_iter().zip(speeds).zip(names).zip(uptimes);
    for (((port, speed), description), uptime) in columns {
        interfaces.insert(
            port.name.clone(),
            Interface {
                is_up: port.is_up(),
                is_enabled: port.is_enabled(),
                description,
                last_flapping: uptime as f64,
                speed,
                mac_address: port.mac_address,
            },
        );
    }

    Ok(interfaces)
}
