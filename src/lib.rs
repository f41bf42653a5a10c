//! geoinfo - resolve the real client IP of an HTTP request and enrich it
//! with GeoLite2 city and ASN data.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//!
//! # Architecture
//! - `utils::ip`: private/reserved range table, address classification and parsing
//! - `services`: client IP resolver, GeoIP providers, client info service
//! - `api`: HTTP handlers and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
