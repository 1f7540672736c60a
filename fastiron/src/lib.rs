//! # FastIron
//!
//! Structured facts and configuration diffs for Ruckus/Brocade FastIron
//! switches, extracted from plain CLI output.
//!
//! FastIron has no structured management API worth relying on, so this
//! crate reads the same `show` reports an operator would. Extraction is
//! anchor based: find a literal word, read the token a fixed distance from
//! it. Configuration text is segmented into `!`-delimited blocks and diffed
//! block by block.
//!
//! ## Features
//!
//! - Pure extractors for uptime, model, serial, interfaces, environment
//!   sensors, ARP, NTP and IPv6 prefixes
//! - Block-aware diff producing `+`/`-` annotated configuration text
//! - Replace and merge candidate staging
//! - An async driver over any [`driver::Session`] implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fastiron::{DriverBuilder, Session};
//!
//! # async fn example(session: impl Session) -> Result<(), fastiron::Error> {
//! let mut driver = DriverBuilder::new("192.168.1.1").build(session);
//!
//! let env = driver.get_environment().await?;
//! println!("cpu at {}%", env.cpu.usage);
//!
//! driver.load_merge_candidate(None, Some("!\nvlan 30 name voice\n"))?;
//! print!("{}", driver.compare_config().await?);
//!
//! driver.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The extractors can also be used on saved output without a session:
//!
//! ```rust
//! let secs = fastiron::facts::system::uptime("3 day(s) 4 hour(s) 5 minute(s) 6 second(s)")?;
//! assert_eq!(secs, 273_906);
//! # Ok::<(), fastiron::Error>(())
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod facts;
pub mod text;

// Re-export main types for convenience
pub use config::{CandidateKind, CandidateStore, ConfigBlock, ConfigBlockSet};
pub use driver::{DriverBuilder, DriverOptions, FastIronDriver, Session};
pub use error::{Error, Result};
pub use facts::{ArpEntry, Environment, Facts, Interface, Ipv6Prefix, NtpPeer};
