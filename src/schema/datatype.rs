//! Value checks attached to schema options
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length of a Linux network interface name
const IFNAMSIZ: usize = 15;

/// Declared datatype of an option value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datatype {
    /// Free text
    Any,
    /// `'0'` or `'1'`
    Bool,
    /// TCP/UDP port, 1 to 65535
    Port,
    /// IPv4 address, optionally with a prefix length or dotted netmask
    Ipv4,
    /// Network interface name
    Device,
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Datatype::Any => "value",
            Datatype::Bool => "boolean",
            Datatype::Port => "port",
            Datatype::Ipv4 => "IPv4 address or network",
            Datatype::Device => "interface name",
        };
        f.write_str(name)
    }
}

impl Datatype {
    /// Check a single non-empty value
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Datatype::Any => true,
            Datatype::Bool => value == "0" || value == "1",
            Datatype::Port => parse_port(value).is_some(),
            Datatype::Ipv4 => parse_ipv4(value).is_some(),
            Datatype::Device => is_device(value),
        }
    }
}

/// Map the boolean spellings the store tolerates onto `'0'`/`'1'`
pub fn normalize_bool(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some("1"),
        "0" | "false" | "no" | "off" | "disabled" => Some("0"),
        _ => None,
    }
}

fn parse_port(value: &str) -> Option<u16> {
    let port: i64 = value.parse().ok()?;
    if (1..=65535).contains(&port) {
        Some(port as u16)
    } else {
        None
    }
}

/// Parse `a.b.c.d`, `a.b.c.d/len` or `a.b.c.d/netmask` into address and prefix length
pub fn parse_ipv4(value: &str) -> Option<(Ipv4Addr, u8)> {
    let (addr, mask) = match value.split_once('/') {
        Some((addr, mask)) => (addr, Some(mask)),
        None => (value, None),
    };

    let ip = Ipv4Addr::from_str(addr).ok()?;
    let prefix_len = match mask {
        None => 32,
        Some(m) if m.contains('.') => netmask_bits(&Ipv4Addr::from_str(m).ok()?)?,
        Some(m) => {
            let len: u8 = m.parse().ok()?;
            if len > 32 {
                return None;
            }
            len
        }
    };

    Some((ip, prefix_len))
}

/// Prefix length of a contiguous netmask
fn netmask_bits(netmask: &Ipv4Addr) -> Option<u8> {
    let value = u32::from(*netmask);
    let bits = value.count_ones();
    // contiguous masks are all ones followed by all zeros
    if value.checked_shl(bits).unwrap_or(0) != 0 {
        return None;
    }
    Some(bits as u8)
}

fn is_device(value: &str) -> bool {
    value.len() <= IFNAMSIZ
        && value != "."
        && value != ".."
        && !value
            .chars()
            .any(|c| c == '/' || c == ':' || c.is_whitespace())
}
