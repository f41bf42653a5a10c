//! HTTP layer
//!
//! - `middleware`: request id, access log
//! - `services`: `/info` and `/health` handlers

pub mod middleware;
pub mod services;
