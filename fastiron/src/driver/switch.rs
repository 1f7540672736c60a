//! FastIron driver implementation.

use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use super::Session;
use super::builder::DriverOptions;
use crate::config::{Candidate, CandidateStore, ConfigBlockSet, additions, compare};
use crate::error::{ConnectionError, Error, Result};
use crate::facts::{
    ArpEntry, Environment, Facts, Interface, Ipv6Prefix, NtpPeer, environment, interfaces,
    neighbors,
};
use crate::text::strip_ansi;

const SHOW_VERSION: &str = "show version";
const SHOW_HOSTNAME: &str = "show running-config | include hostname";
const SHOW_INTERFACES_BRIEF: &str = "show interfaces brief";
const SHOW_CHASSIS: &str = "show chassis";
const SHOW_INLINE_POWER: &str = "show inline power";
const SHOW_CPU: &str = "show cpu";
const SHOW_MEMORY: &str = "show memory";
const SHOW_INTERFACE_SPEED: &str = "show interfaces | include speed";
const SHOW_INTERFACE_NAME: &str = "show interfaces | include Port name|No port name";
const SHOW_INTERFACE_UPTIME: &str = "show interfaces | include Port up|Port down";
const SHOW_IPV6_INTERFACE: &str = "show ipv6 interface";
const SHOW_ARP: &str = "show arp";
const SHOW_NTP: &str = "show ntp associations";
const SHOW_RUNNING_CONFIG: &str = "show running-config";

/// Sent by [`FastIronDriver::is_alive`]; the switch ignores it.
const KEEPALIVE: &str = "\0";

/// Driver for Ruckus/Brocade FastIron switches.
///
/// Wraps a [`Session`] and exposes typed facts and candidate
/// configuration handling. Every command output is cleaned of terminal
/// escape sequences before it is parsed.
pub struct FastIronDriver<S> {
    options: DriverOptions,
    session: S,
    candidates: CandidateStore,
}

impl<S: Session> FastIronDriver<S> {
    /// Create a driver over an open session.
    pub fn new(options: DriverOptions, session: S) -> Self {
        let candidates = CandidateStore::with_delimiter(options.config_delimiter.clone());
        Self {
            options,
            session,
            candidates,
        }
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// The underlying session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Mutable access to the underlying session.
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Staged candidates.
    pub fn candidates(&self) -> &CandidateStore {
        &self.candidates
    }

    /// Run a command and return its output with escape sequences removed.
    ///
    /// An I/O failure while the output is being read is reported as
    /// [`ConnectionError::Closed`].
    pub async fn send_command(&mut self, command: &str) -> Result<String> {
        if !self.session.is_connected() {
            return Err(ConnectionError::NotConnected.into());
        }

        debug!("{}: sending '{}'", self.options.target(), command);
        let raw = self
            .session
            .send_command(command)
            .await
            .map_err(|e| match e {
                Error::Connection(ConnectionError::Io(io)) => ConnectionError::Closed {
                    command: command.to_string(),
                    message: io.to_string(),
                }
                .into(),
                other => other,
            })?;

        Ok(strip_ansi(&raw))
    }

    /// Try each command in turn until one is accepted.
    ///
    /// Returns the output of the first command whose output does not
    /// contain the invalid-input marker, or the last output if all were
    /// rejected.
    pub async fn send_first_valid(&mut self, commands: &[&str]) -> Result<String> {
        let mut output = String::new();
        for command in commands {
            output = self.send_command(command).await?;
            if !output.contains(&self.options.invalid_input_marker) {
                break;
            }
            debug!("{}: '{}' rejected", self.options.target(), command);
        }
        Ok(output)
    }

    /// Check the session by sending a NUL byte.
    ///
    /// Any error counts as dead; otherwise the session's own view of the
    /// transport decides.
    pub async fn is_alive(&mut self) -> bool {
        match self.session.send_command(KEEPALIVE).await {
            Ok(_) => self.session.is_connected(),
            Err(e) => {
                debug!("{}: keepalive failed: {}", self.options.target(), e);
                false
            }
        }
    }

    /// Close the session.
    pub async fn close(&mut self) -> Result<()> {
        debug!("{}: closing session", self.options.target());
        self.session.disconnect().await
    }

    /// Identity facts: uptime, model, hostname, version, serial and
    /// interface names.
    pub async fn get_facts(&mut self) -> Result<Facts> {
        let version = self.send_command(SHOW_VERSION).await?;
        let hostname = self.send_command(SHOW_HOSTNAME).await?;
        let brief = self.send_command(SHOW_INTERFACES_BRIEF).await?;

        Facts::from_reports(&version, &hostname, &brief)
    }

    /// Fans, temperature sensors, power supplies, CPU and memory.
    pub async fn get_environment(&mut self) -> Result<Environment> {
        let chassis = self.send_command(SHOW_CHASSIS).await?;
        let inline = self.send_command(SHOW_INLINE_POWER).await?;
        let cpu = self.send_command(SHOW_CPU).await?;
        let memory = self.send_command(SHOW_MEMORY).await?;

        environment::environment(&chassis, &inline, &cpu, &memory)
    }

    /// Per-port state of every physical interface, keyed by port name.
    pub async fn get_interfaces(&mut self) -> Result<IndexMap<String, Interface>> {
        let brief = self.send_command(SHOW_INTERFACES_BRIEF).await?;
        let speeds = self.send_command(SHOW_INTERFACE_SPEED).await?;
        let names = self.send_command(SHOW_INTERFACE_NAME).await?;
        let uptimes = self.send_command(SHOW_INTERFACE_UPTIME).await?;

        interfaces::interfaces(&brief, &speeds, &names, &uptimes)
    }

    /// IPv6 addresses configured on `interface`.
    pub async fn get_interfaces_ipv6(
        &mut self,
        interface: &str,
    ) -> Result<IndexMap<String, Ipv6Prefix>> {
        let output = self.send_command(SHOW_IPV6_INTERFACE).await?;
        neighbors::ipv6_neighbors(&output, interface)
    }

    pub async fn get_arp_table(&mut self) -> Result<Vec<ArpEntry>> {
        let output = self.send_command(SHOW_ARP).await?;
        neighbors::arp_table(&output)
    }

    pub async fn get_ntp_peers(&mut self) -> Result<IndexMap<String, NtpPeer>> {
        let output = self.send_command(SHOW_NTP).await?;
        neighbors::ntp_peers(&output)
    }

    /// Stage a configuration that should replace the running one.
    ///
    /// `path` takes precedence over `config`. Nothing is sent to the switch.
    pub fn load_replace_candidate(
        &mut self,
        path: Option<&Path>,
        config: Option<&str>,
    ) -> Result<&Candidate> {
        self.candidates.load_replace_candidate(path, config)
    }

    /// Stage a configuration to be merged into the running one.
    ///
    /// `path` takes precedence over `config`. Nothing is sent to the switch.
    pub fn load_merge_candidate(
        &mut self,
        path: Option<&Path>,
        config: Option<&str>,
    ) -> Result<&Candidate> {
        self.candidates.load_merge_candidate(path, config)
    }

    /// Drop both staged candidates.
    pub fn discard_config(&mut self) {
        self.candidates.clear_all();
    }

    /// Diff the running configuration against the staged candidate.
    ///
    /// A replace candidate yields the full diff, additions and removals.
    /// A merge candidate yields only the lines it would add. With nothing
    /// staged the diff is empty and the switch is not queried.
    pub async fn compare_config(&mut self) -> Result<String> {
        if self.candidates.is_empty() {
            return Ok(String::new());
        }

        let running = self.send_command(SHOW_RUNNING_CONFIG).await?;
        let running = ConfigBlockSet::from_text(&running, &self.options.config_delimiter);

        let diff = if let Some(candidate) = self.candidates.replace_candidate() {
            compare(&running, candidate.blocks())
        } else if let Some(candidate) = self.candidates.merge_candidate() {
            additions(&running, candidate.blocks())
        } else {
            String::new()
        };

        debug!(
            "{}: candidate differs in {} lines",
            self.options.target(),
            diff.lines().count()
        );
        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;

    use super::*;
    use crate::driver::DriverBuilder;

    /// Session answering from a fixed table of outputs.
    #[derive(Default)]
    struct ScriptedSession {
        outputs: HashMap<String, String>,
        sent: Vec<String>,
        connected: bool,
        broken: bool,
    }

    impl ScriptedSession {
        fn new() -> Self {
            Self {
                connected: true,
                ..Default::default()
            }
        }

        fn with(mut self, command: &str, output: &str) -> Self {
            self.outputs.insert(command.to_string(), output.to_string());
            self
        }
    }

    impl Session for ScriptedSession {
        async fn send_command(&mut self, command: &str) -> Result<String> {
            self.sent.push(command.to_string());
            if self.broken {
                return Err(ConnectionError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "broken pipe",
                ))
                .into());
            }
            Ok(self.outputs.get(command).cloned().unwrap_or_default())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn disconnect(&mut self) -> Result<()> {
            self.connected = false;
            Ok(())
        }
    }

    fn driver(session: ScriptedSession) -> FastIronDriver<ScriptedSession> {
        let _ = env_logger::builder().is_test(true).try_init();
        DriverBuilder::new("sw1").build(session)
    }

    const SHOW_VERSION_OUTPUT: &str = "\
        SW: Version 08.0.30bT211
  HW: Stackable ICX7250-24P
         Serial  #:BCW2222K00Y
  The system uptime is 3 day(s) 4 hour(s) 5 minute(s) 6 second(s)
";

    const BRIEF_OUTPUT: &str = "\
Port       Link    State   Dupl Speed Trunk Tag Pvid Pri MAC             Name
1/1/1      Up      Forward Full 1G    None  No  1    0   cc4e.24b4.1f5c  uplink
1/1/2      Down    None    None None  None  No  1    0   cc4e.24b4.1f5d
ve10       Up      N/A     N/A  N/A   N/A   N/A N/A  N/A cc4e.24b4.1f5c
";

    const RUNNING: &str = "\
!
interface ethernet 1/1/1
 port-name old
!
vlan 20 name guests by port
 untagged ethe 1/1/5
!
";

    #[tokio::test]
    async fn test_send_command_strips_escapes() {
        let session = ScriptedSession::new().with("show clock", "\x1b[1m12:00:00\x1b[0m\r\n");
        let mut driver = driver(session);
        assert_eq!(driver.send_command("show clock").await.unwrap(), "12:00:00\n");
    }

    #[tokio::test]
    async fn test_send_command_io_failure_is_closed() {
        let mut session = ScriptedSession::new();
        session.broken = true;
        let mut driver = driver(session);

        let err = driver.send_command("show arp").await.unwrap_err();
        match err {
            Error::Connection(ConnectionError::Closed { command, message }) => {
                assert_eq!(command, "show arp");
                assert!(message.contains("broken pipe"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_command_not_connected() {
        let mut session = ScriptedSession::new();
        session.connected = false;
        let mut driver = driver(session);

        let err = driver.send_command("show arp").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::NotConnected)
        ));
        assert!(driver.session().sent.is_empty());
    }

    #[tokio::test]
    async fn test_send_first_valid() {
        let session = ScriptedSession::new()
            .with("show lldp", "% Invalid input -> lldp")
            .with("show lldp neighbors", "Lcl Port Chassis Id");
        let mut driver = driver(session);

        let output = driver
            .send_first_valid(&["show lldp", "show lldp neighbors", "show never"])
            .await
            .unwrap();
        assert_eq!(output, "Lcl Port Chassis Id");
        assert_eq!(driver.session().sent, vec!["show lldp", "show lldp neighbors"]);
    }

    #[tokio::test]
    async fn test_send_first_valid_all_rejected() {
        let session = ScriptedSession::new()
            .with("a", "% Invalid input -> a")
            .with("b", "% Invalid input -> b");
        let mut driver = driver(session);
        let output = driver.send_first_valid(&["a", "b"]).await.unwrap();
        assert_eq!(output, "% Invalid input -> b");
    }

    #[tokio::test]
    async fn test_is_alive_and_close() {
        let mut driver = driver(ScriptedSession::new());
        assert!(driver.is_alive().await);
        assert_eq!(driver.session().sent, vec!["\0"]);

        driver.close().await.unwrap();
        assert!(!driver.is_alive().await);
    }

    #[tokio::test]
    async fn test_is_alive_on_broken_session() {
        let mut session = ScriptedSession::new();
        session.broken = true;
        let mut driver = driver(session);
        assert!(!driver.is_alive().await);
    }

    #[tokio::test]
    async fn test_get_facts() {
        let session = ScriptedSession::new()
            .with(SHOW_VERSION, SHOW_VERSION_OUTPUT)
            .with(SHOW_HOSTNAME, "hostname core-sw1\n")
            .with(SHOW_INTERFACES_BRIEF, BRIEF_OUTPUT);
        let mut driver = driver(session);

        let facts = driver.get_facts().await.unwrap();
        assert_eq!(facts.uptime, 273_906);
        assert_eq!(facts.model, "ICX7250-24P");
        assert_eq!(facts.hostname, "core-sw1");
        assert_eq!(facts.interface_list, vec!["1/1/1", "1/1/2", "ve10"]);
    }

    #[tokio::test]
    async fn test_get_interfaces() {
        let session = ScriptedSession::new()
            .with(SHOW_INTERFACES_BRIEF, BRIEF_OUTPUT)
            .with(
                SHOW_INTERFACE_SPEED,
                "  Configured speed auto, actual 1Gbit, configured duplex fdx, actual fdx\n",
            )
            .with(SHOW_INTERFACE_NAME, "  Port name is uplink\n  No port name\n")
            .with(SHOW_INTERFACE_UPTIME, "  Port up for 5 second(s)\n");
        let mut driver = driver(session);

        let interfaces = driver.get_interfaces().await.unwrap();
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces["1/1/1"].speed, 1000);
        assert_eq!(interfaces["1/1/1"].last_flapping, 5.0);
        assert_eq!(interfaces["1/1/2"].speed, 0);
        assert!(!interfaces["1/1/2"].is_up);
    }

    #[tokio::test]
    async fn test_get_interfaces_unknown_speed() {
        let session = ScriptedSession::new()
            .with(SHOW_INTERFACES_BRIEF, BRIEF_OUTPUT)
            .with(SHOW_INTERFACE_SPEED, "  Configured speed 25Gbit, actual 25Gbit,\n");
        let mut driver = driver(session);

        let err = driver.get_interfaces().await.unwrap_err();
        assert!(matches!(err, Error::UnrecognizedValue(_)));
    }

    #[tokio::test]
    async fn test_get_arp_and_ntp() {
        let session = ScriptedSession::new()
            .with(SHOW_ARP, "1 10.0.0.1 aa:bb:cc:dd:ee:ff dynamic 12 eth1 Valid\n")
            .with(SHOW_NTP, "");
        let mut driver = driver(session);

        let arp = driver.get_arp_table().await.unwrap();
        assert_eq!(arp[0].ip, "10.0.0.1");
        assert!(driver.get_ntp_peers().await.unwrap().is_empty());
    }

    #[test]
    fn test_ntp_peers_blocking() {
        let session = ScriptedSession::new().with(
            SHOW_NTP,
            "  address  ref clock  st when poll reach delay offset disp\n\
             *~10.0.0.1  10.1.1.1  2  25  64  3  2.8  0.2  39.0\n",
        );
        let mut driver = driver(session);

        let peers = tokio_test::block_on(driver.get_ntp_peers()).unwrap();
        assert!(peers.contains_key("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_get_interfaces_ipv6() {
        let session = ScriptedSession::new().with(
            SHOW_IPV6_INTERFACE,
            "Interface ve 10 2001:db8::1/64\n  fe80::1/10\n",
        );
        let mut driver = driver(session);

        let prefixes = driver.get_interfaces_ipv6("Interface").await.unwrap();
        assert_eq!(prefixes["2001:db8::1"].prefix_length, "64");
        assert_eq!(prefixes["fe80::1"].prefix_length, "10");
    }

    #[tokio::test]
    async fn test_compare_config_nothing_staged() {
        let mut driver = driver(ScriptedSession::new().with(SHOW_RUNNING_CONFIG, RUNNING));
        assert_eq!(driver.compare_config().await.unwrap(), "");
        assert!(driver.session().sent.is_empty());
    }

    #[tokio::test]
    async fn test_compare_config_replace() {
        let mut driver = driver(ScriptedSession::new().with(SHOW_RUNNING_CONFIG, RUNNING));
        driver
            .load_replace_candidate(None, Some("!\ninterface ethernet 1/1/1\n port-name new\n!\n"))
            .unwrap();

        let diff = driver.compare_config().await.unwrap();
        assert_eq!(
            diff,
            "\
interface ethernet 1/1/1
-  port-name old
+  port-name new
- vlan 20 name guests by port
-  untagged ethe 1/1/5
"
        );
    }

    #[tokio::test]
    async fn test_compare_config_merge_additions_only() {
        let mut driver = driver(ScriptedSession::new().with(SHOW_RUNNING_CONFIG, RUNNING));
        driver
            .load_merge_candidate(None, Some("!\nvlan 30 name voice by port\n tagged ethe 1/1/2\n"))
            .unwrap();

        let diff = driver.compare_config().await.unwrap();
        assert_eq!(
            diff,
            "+ vlan 30 name voice by port\n+  tagged ethe 1/1/2\n"
        );
    }

    #[tokio::test]
    async fn test_discard_config() {
        let mut driver = driver(ScriptedSession::new().with(SHOW_RUNNING_CONFIG, RUNNING));
        driver.load_merge_candidate(None, Some("!\nvlan 30\n")).unwrap();
        driver.discard_config();
        assert!(driver.candidates().is_empty());
        assert_eq!(driver.compare_config().await.unwrap(), "");
    }
}
