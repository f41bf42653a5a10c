//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for geoinfo using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::config::StaticConfig;

/// geoinfo - client IP resolution and GeoIP enrichment service
#[derive(Parser, Debug)]
#[command(name = "geoinfo")]
#[command(version)]
#[command(about = "Resolve the real client IP behind proxies and look it up", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// HTTP listen port
    #[arg(long, short = 'p', global = true)]
    pub port: Option<u16>,

    /// HTTP listen host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Path to GeoLite2-City.mmdb
    #[arg(long, global = true)]
    pub city_db: Option<String>,

    /// Path to GeoLite2-ASN.mmdb (empty string disables ASN enrichment)
    #[arg(long, global = true)]
    pub asn_db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Look up a single IP address and print the record as JSON
    Lookup {
        /// IPv4 or IPv6 literal
        ip: String,
    },

    /// Resolve the client IP from hand-supplied request data
    Resolve {
        /// Transport peer address, e.g. 10.0.0.2:51234
        #[arg(long)]
        peer: Option<String>,

        /// X-Forwarded-For header value
        #[arg(long)]
        forwarded_for: Option<String>,

        /// X-Real-IP header value
        #[arg(long)]
        real_ip: Option<String>,

        /// Explicit override (the `ip` query parameter)
        #[arg(long)]
        ip: Option<String>,
    },

    /// Write a sample configuration file
    GenerateConfig {
        /// Output path (default: stdout)
        path: Option<String>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut StaticConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(city_db) = &self.city_db {
            config.geoip.city_db_path = city_db.clone();
        }
        if let Some(asn_db) = &self.asn_db {
            config.geoip.asn_db_path = (!asn_db.is_empty()).then(|| asn_db.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_server() {
        let cli = Cli::try_parse_from(["geoinfo"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_port_override() {
        let cli = Cli::try_parse_from(["geoinfo", "-p", "9090"]).unwrap();
        let mut config = StaticConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_empty_asn_db_disables_asn() {
        let cli = Cli::try_parse_from(["geoinfo", "--asn-db", "", "--city-db", "/tmp/c.mmdb"])
            .unwrap();
        let mut config = StaticConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.geoip.asn_db_path, None);
        assert_eq!(config.geoip.city_db_path, "/tmp/c.mmdb");
    }

    #[test]
    fn test_resolve_subcommand() {
        let cli = Cli::try_parse_from([
            "geoinfo",
            "resolve",
            "--peer",
            "10.0.0.1:80",
            "--forwarded-for",
            "203.0.113.9, 10.0.0.5",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Resolve {
                peer: Some("10.0.0.1:80".to_string()),
                forwarded_for: Some("203.0.113.9, 10.0.0.5".to_string()),
                real_ip: None,
                ip: None,
            })
        );
    }

    #[test]
    fn test_lookup_requires_ip() {
        assert!(Cli::try_parse_from(["geoinfo", "lookup"]).is_err());
    }
}
