//! CLI mode
//!
//! One-shot commands that reuse the server's resolution and lookup path
//! without starting an HTTP listener.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::StaticConfig;
use crate::services::{
    ClientInfoService, ClientIpResolver, ClientRequest, ForwardHeaders, GeoIpProvider,
    ResolvedAddress, ResolvedClientInfo,
};

/// Look up a single address and return the response record
pub async fn run_lookup(config: &StaticConfig, ip: &str) -> Result<ResolvedClientInfo> {
    let geoip = GeoIpProvider::new(&config.geoip).context("Failed to initialize GeoIP provider")?;
    let service = ClientInfoService::new(Arc::new(geoip));

    let request = ClientRequest {
        override_ip: Some(ip.to_string()),
        ..Default::default()
    };

    service
        .get_client_info(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e.format_simple()))
}

/// Run the resolver against hand-supplied request data
pub fn run_resolve(
    peer: Option<&str>,
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
    override_ip: Option<&str>,
) -> Result<ResolvedAddress> {
    let headers = ForwardHeaders::new(forwarded_for, real_ip);
    ClientIpResolver::default()
        .resolve_detailed(peer, &headers, override_ip)
        .map_err(|e| anyhow::anyhow!(e.format_simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AddressSource;

    #[test]
    fn test_run_resolve_prefers_forwarded_for() {
        let resolved = run_resolve(
            Some("10.0.0.2:4000"),
            Some("198.51.100.4, 10.0.0.1"),
            Some("10.0.0.1"),
            None,
        )
        .unwrap();
        assert_eq!(resolved.ip.to_string(), "198.51.100.4");
        assert_eq!(resolved.source, AddressSource::ForwardedFor);
    }

    #[test]
    fn test_run_resolve_reports_invalid_override() {
        let err = run_resolve(None, None, None, Some("nope")).unwrap_err();
        assert!(err.to_string().contains("Invalid Address"));
    }

    #[tokio::test]
    async fn test_run_lookup_without_database() {
        let mut config = StaticConfig::default();
        config.geoip.city_db_path = "/nonexistent/city.mmdb".to_string();
        config.geoip.asn_db_path = None;

        let err = run_lookup(&config, "8.8.8.8").await.unwrap_err();
        assert!(format!("{:#}", err).contains("city.mmdb"));
    }
}
