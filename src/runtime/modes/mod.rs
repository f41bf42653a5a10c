//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - CLI mode (one-shot lookup / resolve)

pub mod cli;
#[cfg(feature = "server")]
pub mod server;

pub use cli::{run_lookup, run_resolve};
#[cfg(feature = "server")]
pub use server::run_server;

/// 未启用 server feature 时的占位实现
#[cfg(not(feature = "server"))]
pub async fn run_server() -> anyhow::Result<()> {
    anyhow::bail!("geoinfo was built without the `server` feature; use `lookup` or `resolve`")
}
