//! Client info service
//!
//! Ties the resolver and the GeoIP provider together: resolve the request's
//! origin address, then enrich it. Transport-free so the HTTP layer and the
//! CLI share the same path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client_ip::{ClientIpResolver, ForwardHeaders, ResolvedAddress};
use super::geoip::{GeoInfo, GeoIpProvider};
use crate::errors::Result;

/// Everything the resolver needs to know about an inbound request
#[derive(Debug, Clone, Default)]
pub struct ClientRequest {
    /// Transport peer address, `host:port` or `[host]:port`
    pub peer: Option<String>,
    pub headers: ForwardHeaders,
    /// Caller-supplied address to look up instead of the requester's own
    pub override_ip: Option<String>,
}

/// Response record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClientInfo {
    pub ip: String,
    pub country: String,
    pub code: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp_code: Option<u32>,
}

impl ResolvedClientInfo {
    pub fn new(address: &ResolvedAddress, geo: GeoInfo) -> Self {
        Self {
            ip: address.ip.to_string(),
            country: geo.country.unwrap_or_default(),
            code: geo.iso_code.unwrap_or_default(),
            city: geo.city.unwrap_or_default(),
            isp: geo.isp,
            isp_code: geo.isp_code,
        }
    }
}

#[derive(Clone)]
pub struct ClientInfoService {
    resolver: ClientIpResolver<'static>,
    geoip: Arc<GeoIpProvider>,
}

impl ClientInfoService {
    pub fn new(geoip: Arc<GeoIpProvider>) -> Self {
        Self {
            resolver: ClientIpResolver::default(),
            geoip,
        }
    }

    pub fn with_resolver(resolver: ClientIpResolver<'static>, geoip: Arc<GeoIpProvider>) -> Self {
        Self { resolver, geoip }
    }

    pub fn resolver(&self) -> &ClientIpResolver<'static> {
        &self.resolver
    }

    pub fn geoip(&self) -> &GeoIpProvider {
        &self.geoip
    }

    /// Resolve the request's origin and look it up
    ///
    /// Resolution errors short-circuit before any lookup is attempted.
    pub async fn get_client_info(&self, request: &ClientRequest) -> Result<ResolvedClientInfo> {
        let address = self.resolver.resolve_detailed(
            request.peer.as_deref(),
            &request.headers,
            request.override_ip.as_deref(),
        )?;
        debug!("Client address {} resolved from {}", address.ip, address.source);

        let geo = self.geoip.lookup(address.ip).await?;
        Ok(ResolvedClientInfo::new(&address, geo))
    }
}
