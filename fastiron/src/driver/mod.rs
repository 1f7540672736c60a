//! High-level driver for FastIron switches.
//!
//! The driver turns raw command output into typed facts and manages staged
//! configuration candidates. Reaching the switch is delegated to a
//! [`Session`], so any SSH or telnet client that can run a command and hand
//! back its output can back a [`FastIronDriver`].

mod builder;
mod switch;

pub use builder::{DriverBuilder, DriverOptions};
pub use switch::FastIronDriver;

use std::future::Future;

use crate::error::Result;

/// An open CLI session to a switch.
///
/// Implementations handle prompts, paging and privilege themselves and
/// return the command output only. Transport failures should surface as
/// [`ConnectionError`](crate::error::ConnectionError); a switch that cannot
/// be reached maps to [`DriverOptions::unreachable`].
pub trait Session: Send {
    /// Run one command and return its output.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Whether the underlying transport is still up.
    fn is_connected(&self) -> bool;

    /// Close the session.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;
}
