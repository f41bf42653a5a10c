use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{ClientInfoService, GeoIpProvider};
use crate::utils::ip::PrivateRangeTable;

pub struct StartupContext {
    pub client_info_service: Arc<ClientInfoService>,
}

/// 准备服务器启动的上下文
///
/// 地址表和 GeoIP 数据库都在处理第一个请求之前就绪。
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let ranges = PrivateRangeTable::global();
    debug!("Private range table ready with {} prefixes", ranges.prefixes().len());

    let geoip = GeoIpProvider::new(&config.geoip).context("Failed to initialize GeoIP provider")?;
    let client_info_service = Arc::new(ClientInfoService::new(Arc::new(geoip)));

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        client_info_service,
    })
}
