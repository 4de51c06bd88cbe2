//! Option declarations for the `easytier` config package
use super::condition::{Clause, Condition};
use super::datatype::Datatype;
use super::option::{OptionKind, OptionSpec};
use super::{Cardinality, SectionSchema};

/// Guide for managing nodes from the web console
pub const WEB_CONSOLE_URL: &str = "https://easytier.cn/en/guide/network/web-console.html";

/// Community-provided shared node, suggested for the `peers` option
pub const PUBLIC_PEER: &str = "tcp://public.easytier.cn:11010";

const CONSOLE_MODE: &[Clause] = &[&[Condition::eq("console", "1")]];
const LOCAL_MODE: &[Clause] = &[&[Condition::eq("console", "0")]];
const HAS_CONFIG_PATH: &[Clause] = &[&[Condition::non_empty("config_path")]];
const FORWARDING: &[Clause] = &[&[Condition::eq("fw_allow_forward", "1")]];
const MASQUERADING: &[Clause] = &[&[Condition::eq("fw_allow_masq", "1")]];

static GLOBAL_OPTIONS: &[OptionSpec] = &[
    OptionSpec::flag("enabled", "Enable"),
    OptionSpec::flag("console", "Web Console")
        .description("Use the Web Console to manage EasyTier nodes."),
    OptionSpec::value("server", "Configuration server address")
        .required()
        .depends(CONSOLE_MODE)
        .description(
            "Full url like udp://127.0.0.1:22020/admin or username only to use official server",
        ),
    OptionSpec::value("machine", "Machine ID")
        .depends(CONSOLE_MODE)
        .description("Leave empty to obtain machine ID from system"),
    OptionSpec::value("network", "Network name")
        .required()
        .depends(LOCAL_MODE)
        .description("Used to identify this VPN network"),
    OptionSpec::value("secret", "Network secret")
        .kind(OptionKind::Secret)
        .required()
        .depends(LOCAL_MODE)
        .description("Used to verify that this node belongs to the VPN network"),
    OptionSpec::flag("dhcp", "DHCP")
        .depends(LOCAL_MODE)
        .description(
            "Automatically assign virtual IP, default allocation is 10.126.126.0/24 network segment.",
        ),
    OptionSpec::value("ipv4", "IPv4 address")
        .datatype(Datatype::Ipv4)
        .placeholder("10.126.126.0/24")
        .depends(LOCAL_MODE)
        .description("IPv4 network segment of this network."),
    OptionSpec::value("peers", "Peer nodes")
        .kind(OptionKind::OrderedList)
        .placeholder("tcp://example.cn:11010")
        .depends(LOCAL_MODE)
        .description(
            "Without a public IP, the free shared nodes provided by the EasyTier community allow quick networking.",
        ),
    OptionSpec::value("hostname", "Hostname")
        .depends(LOCAL_MODE)
        .description("Hostname used to identify this device."),
    OptionSpec::value("device", "TUN device name")
        .placeholder("easytier")
        .depends(LOCAL_MODE)
        .description("Optional TUN interface name."),
    OptionSpec::value("port", "Listen port").datatype(Datatype::Port),
    OptionSpec::value("local_conf_path", "Local config file")
        .default("/etc/easytier.conf"),
    OptionSpec::value("config_path", "Config directory")
        .default("/etc/easytier"),
    OptionSpec::flag("copy_config_path", "Copy config directory")
        .depends(HAS_CONFIG_PATH)
        .description("Copy the config directory to memory before starting the daemon."),
    OptionSpec::flag("fw_allow_input", "Allow input")
        .description("Open the listen port in the firewall."),
];

static NETWORK_OPTIONS: &[OptionSpec] = &[
    OptionSpec::value("id", "Network ID").required(),
    OptionSpec::flag("enabled", "Enable").default("1"),
    OptionSpec::flag("allow_managed", "Allow managed IPs")
        .default("1")
        .description("Allow IP addresses and routes assigned by the network."),
    OptionSpec::flag("allow_global", "Allow global IPs")
        .description("Allow assigned IPs and routes that overlap public address space."),
    OptionSpec::flag("allow_default", "Allow default route")
        .description("Allow the network to override the system default route."),
    OptionSpec::flag("allow_dns", "Allow DNS")
        .description("Accept DNS configuration pushed by the network."),
    OptionSpec::flag("fw_allow_input", "Allow input"),
    OptionSpec::flag("fw_allow_forward", "Allow forward"),
    OptionSpec::value("fw_forward_ifaces", "Forward interfaces")
        .kind(OptionKind::Set)
        .datatype(Datatype::Device)
        .depends(FORWARDING)
        .description("Leave empty to forward to all interfaces."),
    OptionSpec::flag("fw_allow_masq", "Masquerading"),
    OptionSpec::value("fw_masq_ifaces", "Masquerade interfaces")
        .kind(OptionKind::Set)
        .datatype(Datatype::Device)
        .depends(MASQUERADING)
        .description("Leave empty to masquerade on all interfaces."),
];

/// The singleton `easytier` section named `global`
pub static GLOBAL: SectionSchema = SectionSchema {
    section_type: "easytier",
    cardinality: Cardinality::Named("global"),
    options: GLOBAL_OPTIONS,
};

/// The repeatable anonymous `network` sections
pub static NETWORK: SectionSchema = SectionSchema {
    section_type: "network",
    cardinality: Cardinality::Repeated,
    options: NETWORK_OPTIONS,
};
