//! Service layer
//!
//! - `client_ip`: real client address resolution behind proxy chains
//! - `geoip`: MaxMind city / ASN lookups
//! - `client_info`: resolution + enrichment, shared by HTTP and CLI

pub mod client_info;
pub mod client_ip;
pub mod geoip;

pub use client_info::{ClientInfoService, ClientRequest, ResolvedClientInfo};
pub use client_ip::{AddressSource, ClientIpResolver, ForwardHeaders, ResolvedAddress};
pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};
