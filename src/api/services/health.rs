use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

use crate::services::ClientInfoService;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub geoip: GeoIpHealth,
}

#[derive(Debug, Serialize)]
pub struct GeoIpHealth {
    pub provider: &'static str,
    pub asn_enabled: bool,
}

/// Health Service
///
/// 数据库在启动时加载且只读，运行期间不会失效，因此只汇报状态不做探测。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        service: web::Data<Arc<ClientInfoService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let geoip = service.geoip();
        HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            timestamp: now.to_rfc3339(),
            uptime,
            geoip: GeoIpHealth {
                provider: geoip.provider_name(),
                asn_enabled: geoip.asn_enabled(),
            },
        })
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
