//! Neighbor tables: ARP, NTP associations and per-interface IPv6 prefixes.
//!
//! # Output Examples
//!
//! `show arp` (switch image):
//!
//! ```text
//! No.  IP Address      MAC Address     Type     Age  Port    Status
//! 1    10.0.0.1        cc4e.24b4.1f5c  Dynamic  12   1/1/1   Valid
//! ```
//!
//! `show ntp associations`:
//!
//! ```text
//!   address         ref clock       st  when  poll reach  delay  offset    disp
//! *~172.19.69.1     172.24.114.33    3    25    64    3     2.89    0.234    39.07
//!  ~172.19.69.2     24.56.178.140    2    26    64    3     2.51    3.154    38.75
//!  * synchronized, # selected, + candidate, - outlayer, x falseticker, ~ configured
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::error::{ParseError, Result};
use crate::text::split_lines;

use super::parse_number;

/// ARP header word on router images; takes precedence when present.
const ARP_ROUTER_HEADER: &str = "VLAN";
/// ARP header word on switch images.
const ARP_SWITCH_HEADER: &str = "Status";

const ARP_MIN_COLUMNS: usize = 7;
const ARP_IP_COLUMN: usize = 1;
const ARP_MAC_COLUMN: usize = 2;
const ARP_AGE_COLUMN: usize = 4;
const ARP_PORT_COLUMN: usize = 5;

/// Last header column of `show ntp associations`.
const NTP_HEADER: &str = "disp";
/// Marks configured peers, glued to the address.
const NTP_DECORATION: char = '~';
/// Single-character status flags that may precede the address.
const NTP_STATUS_FLAGS: [char; 5] = ['*', '#', '+', '-', 'x'];
/// Appears only in the trailing legend line.
const NTP_LEGEND_MARKER: &str = "synchronized,";

/// A parent interface row has more than this many tokens.
const IPV6_CHILD_COLUMNS: usize = 2;
const IPV6_PARENT_ADDRESS_COLUMN: usize = 2;
const IPV6_PARENT_LENGTH_COLUMN: usize = 3;

/// One ARP entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArpEntry {
    pub interface: String,
    pub mac: String,
    pub ip: String,
    /// Seconds.
    pub age: f64,
}

/// An NTP peer. No per-peer attributes are reported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NtpPeer {}

/// Prefix length of an IPv6 address, as printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv6Prefix {
    pub prefix_length: String,
}

/// Parse `show arp`.
///
/// Rows start after the `VLAN` header word when present, otherwise after
/// `Status`, otherwise at the top of the text. Rows with fewer than seven
/// columns (blank lines, totals) are skipped.
pub fn arp_table(text: &str) -> Result<Vec<ArpEntry>> {
    let start = text
        .find(ARP_ROUTER_HEADER)
        .map(|idx| idx + ARP_ROUTER_HEADER.len())
        .or_else(|| {
            text.find(ARP_SWITCH_HEADER)
                .map(|idx| idx + ARP_SWITCH_HEADER.len())
        })
        .unwrap_or(0);

    let mut entries = Vec::new();
    for line in split_lines(&text[start..]) {
        let row: Vec<&str> = line.split_whitespace().collect();
        if row.len() < ARP_MIN_COLUMNS {
            debug!("skipping short arp row: {line:?}");
            continue;
        }

        entries.push(ArpEntry {
            interface: row[ARP_PORT_COLUMN].to_string(),
            mac: row[ARP_MAC_COLUMN].to_string(),
            ip: row[ARP_IP_COLUMN].to_string(),
            age: parse_number("arp age", row[ARP_AGE_COLUMN])?,
        });
    }

    Ok(entries)
}

/// Parse `show ntp associations` into peers keyed by address.
///
/// Empty output means no associations. Non-empty output without the
/// `disp` header is a [`ParseError`].
pub fn ntp_peers(text: &str) -> Result<IndexMap<String, NtpPeer>> {
    let mut peers = IndexMap::new();
    if text.trim().is_empty() {
        return Ok(peers);
    }

    let start = text
        .find(NTP_HEADER)
        .ok_or_else(|| ParseError::anchor_not_found(NTP_HEADER, text))?
        + NTP_HEADER.len();

    for line in split_lines(&text[start..]) {
        if line.contains(NTP_LEGEND_MARKER) {
            continue;
        }

        let cleaned = line.replace(NTP_DECORATION, " ");
        let address = cleaned
            .split_whitespace()
            .find(|token| !token.chars().all(|c| NTP_STATUS_FLAGS.contains(&c)));

        if let Some(address) = address {
            peers.insert(address.to_string(), NtpPeer {});
        }
    }

    Ok(peers)
}

/// IPv6 addresses of the single parent interface that follows `anchor`.
///
/// Reading starts right after the first occurrence of `anchor`. A row with
/// more than two tokens is a parent interface (address in the third column,
/// prefix length in the fourth); a two-token row is a child address. The
/// second parent row ends the extraction.
pub fn ipv6_neighbors(text: &str, anchor: &str) -> Result<IndexMap<String, Ipv6Prefix>> {
    let start = text
        .find(anchor)
        .ok_or_else(|| ParseError::anchor_not_found(anchor, text))?
        + anchor.len();

    let rest = text[start..].replace('/', " ");
    let mut prefixes = IndexMap::new();
    let mut parents = 0;

    for line in split_lines(&rest) {
        let row: Vec<&str> = line.split_whitespace().collect();

        if row.len() > IPV6_CHILD_COLUMNS {
            parents += 1;
            if parents > 1 {
                break;
            }
            let (Some(address), Some(length)) = (
                row.get(IPV6_PARENT_ADDRESS_COLUMN),
                row.get(IPV6_PARENT_LENGTH_COLUMN),
            ) else {
                return Err(ParseError::MalformedRow {
                    report: "ipv6 interface".to_string(),
                    row: line.to_string(),
                }
                .into());
            };
            prefixes.insert(
                address.to_string(),
                Ipv6Prefix {
                    prefix_length: length.to_string(),
                },
            );
        } else if row.len() == IPV6_CHILD_COLUMNS {
            prefixes.insert(
                row[0].to_string(),
                Ipv6Prefix {
                    prefix_length: row[1].to_string(),
                },
            );
        }
    }

    Ok(prefixes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_arp_single_row() {
        let entries = arp_table("1 10.0.0.1 aa:bb:cc:dd:ee:ff dynamic 12 eth1 Valid").unwrap();
        assert_eq!(
            entries,
            vec![ArpEntry {
                interface: "eth1".to_string(),
                mac: "aa:bb:cc:dd:ee:ff".to_string(),
                ip: "10.0.0.1".to_string(),
                age: 12.0,
            }]
        );
    }

    #[test]
    fn test_arp_switch_header() {
        let text = "\
Total number of ARP entries: 2
No.  IP Address      MAC Address     Type     Age  Port    Status
1    10.0.0.1        cc4e.24b4.1f5c  Dynamic  12   1/1/1   Valid
2    10.0.0.2        cc4e.24b4.1f5d  Dynamic  3    1/1/2   Valid
";
        let entries = arp_table(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].ip, "10.0.0.2");
        assert_eq!(entries[1].interface, "1/1/2");
        assert_eq!(entries[1].age, 3.0);
    }

    #[test]
    fn test_arp_router_header() {
        let text = "\
No.  IP Address      MAC Address     Type     Age  Port    Status  VLAN
1    10.0.0.1        cc4e.24b4.1f5c  Dynamic  0    1/1/1   Valid   10
";
        let entries = arp_table(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mac, "cc4e.24b4.1f5c");
        assert_eq!(entries[0].age, 0.0);
    }

    #[test]
    fn test_arp_bad_age() {
        let err = arp_table("1 10.0.0.1 aa:bb dynamic soon eth1 Valid").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidNumber { .. })));
    }

    #[test]
    fn test_ntp_peers() {
        let text = "\
  address         ref clock       st  when  poll reach  delay  offset    disp
*~172.19.69.1     172.24.114.33    3    25    64    3     2.89    0.234    39.07
 ~172.19.69.2     24.56.178.140    2    26    64    3     2.51    3.154    38.75
 * synchronized, # selected, + candidate, - outlayer, x falseticker, ~ configured
";
        let peers = ntp_peers(text).unwrap();
        let keys: Vec<_> = peers.keys().cloned().collect();
        assert_eq!(keys, vec!["172.19.69.1", "172.19.69.2"]);
    }

    #[test]
    fn test_ntp_empty_and_missing_header() {
        assert!(ntp_peers("").unwrap().is_empty());
        assert!(ntp_peers("NTP not enabled").is_err());
    }

    #[test]
    fn test_ntp_peer_serializes_empty() {
        let mut peers = IndexMap::new();
        peers.insert("10.0.0.1".to_string(), NtpPeer {});
        assert_eq!(
            serde_json::to_string(&peers).unwrap(),
            r#"{"10.0.0.1":{}}"#
        );
    }

    #[test]
    fn test_ipv6_single_parent() {
        let text = "\
Interface ve 10 2001:db8::1/64
  2001:db8:1::1/64
  fe80::1/10
Interface ve 20 2001:db9::1/64
  2001:db9:1::1/64
";
        let prefixes = ipv6_neighbors(text, "Interface").unwrap();
        let keys: Vec<_> = prefixes.keys().cloned().collect();
        assert_eq!(keys, vec!["2001:db8::1", "2001:db8:1::1", "fe80::1"]);
        assert_eq!(prefixes["2001:db8::1"].prefix_length, "64");
        assert_eq!(prefixes["fe80::1"].prefix_length, "10");
    }

    #[test]
    fn test_ipv6_missing_anchor() {
        let err = ipv6_neighbors("no interfaces", "Interface").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::AnchorNotFound { .. })));
    }

    #[test]
    fn test_ipv6_short_parent_row() {
        let err = ipv6_neighbors("Interface ve 10 2001:db8::1\n", "Interface").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MalformedRow { .. })));
    }
}
