//! IP 地址处理工具
//!
//! 提供：
//! - CIDR 前缀解析与匹配（`IpPrefix`）
//! - 进程级只读的保留/私有地址表（`PrivateRangeTable`）
//! - 公网地址判定、IP 字面量解析、对端地址去端口

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use once_cell::sync::Lazy;

/// 保留/私有网段
///
/// 文档网段（198.51.100.0/24、203.0.113.0/24、2001:db8::/32）不在其中，按公网处理。
const DEFAULT_PRIVATE_RANGES: &[&str] = &[
    // IPv4
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "224.0.0.0/4",
    "240.0.0.0/4",
    // IPv6
    "::/128",
    "::1/128",
    "fc00::/7",
    "fe80::/10",
    "ff00::/8",
];

static GLOBAL_PRIVATE_RANGES: Lazy<PrivateRangeTable> =
    Lazy::new(PrivateRangeTable::default_ranges);

/// CIDR 前缀，例如 `192.168.0.0/16`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpPrefix {
    network: IpAddr,
    prefix_len: u8,
}

impl IpPrefix {
    pub fn new(network: IpAddr, prefix_len: u8) -> Option<Self> {
        let max_len = match network {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        (prefix_len <= max_len).then_some(Self {
            network,
            prefix_len,
        })
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// 检查 IP 是否落在该前缀内（地址族不同则不匹配）
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (ip, self.network) {
            (IpAddr::V4(ip), IpAddr::V4(net)) => {
                let mask = u32::MAX
                    .checked_shl(32 - self.prefix_len as u32)
                    .unwrap_or(0);
                let ip_bits = u32::from_be_bytes(ip.octets());
                let net_bits = u32::from_be_bytes(net.octets());
                (ip_bits & mask) == (net_bits & mask)
            }
            (IpAddr::V6(ip), IpAddr::V6(net)) => {
                let mask = u128::MAX
                    .checked_shl(128 - self.prefix_len as u32)
                    .unwrap_or(0);
                let ip_bits = u128::from_be_bytes(ip.octets());
                let net_bits = u128::from_be_bytes(net.octets());
                (ip_bits & mask) == (net_bits & mask)
            }
            _ => false,
        }
    }
}

impl FromStr for IpPrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((network, prefix_len)) = s.trim().split_once('/') else {
            return Err(format!("Invalid CIDR '{}': missing prefix length", s));
        };

        let network: IpAddr = network
            .parse()
            .map_err(|_| format!("Invalid CIDR '{}': bad network address", s))?;
        let prefix_len: u8 = prefix_len
            .parse()
            .map_err(|_| format!("Invalid CIDR '{}': bad prefix length", s))?;

        Self::new(network, prefix_len)
            .ok_or_else(|| format!("Invalid CIDR '{}': prefix length out of range", s))
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// 保留/私有地址表
///
/// 构建后不再修改，多线程并发只读，无需加锁。
#[derive(Debug, Clone)]
pub struct PrivateRangeTable {
    prefixes: Vec<IpPrefix>,
}

impl PrivateRangeTable {
    pub fn new(prefixes: Vec<IpPrefix>) -> Self {
        Self { prefixes }
    }

    /// 内置的默认网段表
    pub fn default_ranges() -> Self {
        let prefixes = DEFAULT_PRIVATE_RANGES
            .iter()
            .filter_map(|cidr| cidr.parse().ok())
            .collect();
        Self { prefixes }
    }

    /// 进程级单例，首次访问时构建
    pub fn global() -> &'static PrivateRangeTable {
        &GLOBAL_PRIVATE_RANGES
    }

    pub fn prefixes(&self) -> &[IpPrefix] {
        &self.prefixes
    }

    /// 检查 IP 是否落在表中任一网段（IPv4-mapped IPv6 按 IPv4 处理）
    pub fn contains(&self, ip: &IpAddr) -> bool {
        let ip = ip.to_canonical();
        self.prefixes.iter().any(|prefix| prefix.contains(&ip))
    }

    /// 检查 IP 是否为公网地址
    pub fn is_public(&self, ip: &IpAddr) -> bool {
        let ip = ip.to_canonical();
        !(ip.is_loopback() || ip.is_unspecified() || self.contains(&ip))
    }
}

impl Default for PrivateRangeTable {
    fn default() -> Self {
        Self::default_ranges()
    }
}

/// 使用全局地址表判断是否为公网地址
pub fn is_public(ip: &IpAddr) -> bool {
    PrivateRangeTable::global().is_public(ip)
}

/// 字符串版本，无法解析时返回 false
pub fn is_public_str(ip: &str) -> bool {
    parse_ip_literal(ip).is_some_and(|ip| is_public(&ip))
}

/// 解析单个 IP 字面量（去除首尾空白，不接受方括号和端口）
pub fn parse_ip_literal(s: &str) -> Option<IpAddr> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// 从对端地址中去掉端口，得到裸 IP
///
/// 支持 `1.2.3.4:5678`、`[::1]:5678`，以及不带端口的 `1.2.3.4`、`::1`、`[::1]`。
pub fn peer_ip(peer: &str) -> Option<IpAddr> {
    let peer = peer.trim();
    if peer.is_empty() {
        return None;
    }

    if let Ok(addr) = peer.parse::<SocketAddr>() {
        return Some(addr.ip());
    }

    if let Ok(ip) = peer.parse::<IpAddr>() {
        return Some(ip);
    }

    if let Some(rest) = peer.strip_prefix('[') {
        let (host, _) = rest.split_once(']')?;
        return host.parse().ok();
    }

    // host:port，端口本身不合法时仍尝试取 host
    let (host, _) = peer.rsplit_once(':')?;
    match host.parse::<IpAddr>() {
        Ok(ip @ IpAddr::V4(_)) => Some(ip),
        _ => None,
    }
}
