//! Fact extractors for FastIron show-command output.
//!
//! Each extractor is a pure function from raw report text to a typed fact.
//! None of them use a grammar: they find a literal anchor word and read the
//! token a fixed distance from it (see [`crate::text::Anchor`]). Every offset
//! lives in a named constant next to the extractor that uses it, so a
//! firmware release that shifts a column is a one-line change.
//!
//! Fact types serialize to the key names consumers already depend on
//! (`"temperature"`, `"power"`, `"fan"`, `"memory"`, `"cpu"`, ...).

pub mod environment;
pub mod interfaces;
pub mod neighbors;
pub mod system;

pub use environment::{
    CpuUsage, Environment, FanStatus, MemoryUsage, PowerSupply, TemperatureReading,
};
pub use interfaces::{Interface, PortStatus};
pub use neighbors::{ArpEntry, Ipv6Prefix, NtpPeer};

use std::str::FromStr;

use serde::Serialize;

use crate::error::{ParseError, Result};

/// Vendor string reported in [`Facts`].
pub const VENDOR: &str = "Ruckus";

/// Device identity facts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facts {
    /// Seconds since boot.
    pub uptime: u64,
    pub vendor: String,
    pub model: String,
    /// Configured hostname, empty when none is set.
    pub hostname: String,
    pub fqdn: String,
    pub os_version: String,
    pub serial_number: String,
    pub interface_list: Vec<String>,
}

impl Facts {
    /// Build identity facts from `show version`, the hostname line of the
    /// running configuration and `show interfaces brief`.
    ///
    /// Without a configured hostname both `hostname` and `fqdn` are empty.
    pub fn from_reports(version: &str, running_config: &str, brief: &str) -> Result<Self> {
        let hostname = system::hostname(running_config)?.unwrap_or_default();

        Ok(Self {
            uptime: system::uptime(version)?,
            vendor: VENDOR.to_string(),
            model: system::model(version)?,
            fqdn: hostname.clone(),
            hostname,
            os_version: system::os_version(version)?,
            serial_number: system::serial_number(version)?,
            interface_list: interfaces::interface_list(brief, interfaces::BRIEF_HEADER, false),
        })
    }
}

/// Parse a numeric token, naming the field in the error.
pub(crate) fn parse_number<T: FromStr>(field: &str, token: &str) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| ParseError::invalid_number(field, token).into())
}
