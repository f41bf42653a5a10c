//! 客户端真实 IP 解析
//!
//! 优先级（依次尝试）：
//! 1. 显式指定的 IP（例如 `?ip=` 参数），不合法直接报错
//! 2. X-Forwarded-For：从右向左找第一个合法的公网地址
//! 3. X-Real-IP：合法即用，不做公网过滤
//! 4. 连接对端地址（去掉端口）
//!
//! X-Forwarded-For 每一跳都把看到的对端追加到最右侧，客户端只能伪造左侧的条目，
//! 所以从右向左扫描，只信任某一跳实际看到的公网地址。

use std::fmt;
use std::net::IpAddr;

use tracing::{debug, trace};

use crate::errors::{GeoInfoError, Result};
use crate::utils::ip::{PrivateRangeTable, parse_ip_literal, peer_ip};

/// 代理转发相关的请求头（不依赖具体 HTTP 框架）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardHeaders {
    /// `X-Forwarded-For`，逗号分隔，最左为最早的一跳
    pub forwarded_for: Option<String>,
    /// `X-Real-IP`，由最近一层代理设置
    pub real_ip: Option<String>,
}

impl ForwardHeaders {
    pub fn new(forwarded_for: Option<&str>, real_ip: Option<&str>) -> Self {
        Self {
            forwarded_for: forwarded_for.map(String::from),
            real_ip: real_ip.map(String::from),
        }
    }
}

/// 最终采用的地址来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    Override,
    ForwardedFor,
    RealIp,
    Peer,
}

impl AddressSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::ForwardedFor => "x-forwarded-for",
            Self::RealIp => "x-real-ip",
            Self::Peer => "peer",
        }
    }
}

impl fmt::Display for AddressSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub ip: IpAddr,
    pub source: AddressSource,
}

/// 客户端 IP 解析器
///
/// 纯函数：只读取输入和只读的地址表，可在任意线程并发调用。
#[derive(Debug, Clone, Copy)]
pub struct ClientIpResolver<'a> {
    ranges: &'a PrivateRangeTable,
}

impl Default for ClientIpResolver<'static> {
    fn default() -> Self {
        Self::new(PrivateRangeTable::global())
    }
}

impl<'a> ClientIpResolver<'a> {
    pub fn new(ranges: &'a PrivateRangeTable) -> Self {
        Self { ranges }
    }

    /// 解析请求的来源 IP
    pub fn resolve(
        &self,
        peer: Option<&str>,
        headers: &ForwardHeaders,
        override_ip: Option<&str>,
    ) -> Result<IpAddr> {
        self.resolve_detailed(peer, headers, override_ip)
            .map(|resolved| resolved.ip)
    }

    /// 解析请求的来源 IP，同时返回地址来源
    pub fn resolve_detailed(
        &self,
        peer: Option<&str>,
        headers: &ForwardHeaders,
        override_ip: Option<&str>,
    ) -> Result<ResolvedAddress> {
        if let Some(raw) = override_ip.map(str::trim).filter(|s| !s.is_empty()) {
            let ip = parse_ip_literal(raw).ok_or_else(|| {
                GeoInfoError::invalid_address(format!("'{}' is not a valid IP address", raw))
            })?;
            trace!("Using explicit override: {}", ip);
            return Ok(ResolvedAddress {
                ip,
                source: AddressSource::Override,
            });
        }

        if let Some(ip) = headers
            .forwarded_for
            .as_deref()
            .and_then(|xff| self.rightmost_public(xff))
        {
            debug!("Resolved client IP from X-Forwarded-For: {}", ip);
            return Ok(ResolvedAddress {
                ip,
                source: AddressSource::ForwardedFor,
            });
        }

        if let Some(raw) = headers.real_ip.as_deref().filter(|s| !s.trim().is_empty()) {
            match parse_ip_literal(raw) {
                Some(ip) => {
                    debug!("Resolved client IP from X-Real-IP: {}", ip);
                    return Ok(ResolvedAddress {
                        ip,
                        source: AddressSource::RealIp,
                    });
                }
                None => debug!("Ignoring malformed X-Real-IP: {:?}", raw),
            }
        }

        match peer.and_then(peer_ip) {
            Some(ip) => {
                trace!("Falling back to peer address: {}", ip);
                Ok(ResolvedAddress {
                    ip,
                    source: AddressSource::Peer,
                })
            }
            None => Err(GeoInfoError::no_resolvable_address(format!(
                "no usable address in headers or peer {:?}",
                peer.unwrap_or_default()
            ))),
        }
    }

    /// 从右向左扫描，返回第一个合法的公网地址
    fn rightmost_public(&self, forwarded_for: &str) -> Option<IpAddr> {
        forwarded_for
            .rsplit(',')
            .filter_map(parse_ip_literal)
            .find(|ip| self.ranges.is_public(ip))
    }
}
