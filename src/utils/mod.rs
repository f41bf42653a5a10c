pub mod ip;

pub use ip::{IpPrefix, PrivateRangeTable, is_public, is_public_str, parse_ip_literal, peer_ip};
