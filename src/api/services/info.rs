//! `/info` endpoint
//!
//! 将 HTTP 请求转换为与框架无关的 `ClientRequest`，
//! 并负责把错误类型映射为状态码和 `{"status": "..."}` 响应体。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::GeoInfoError;
use crate::services::{ClientInfoService, ClientRequest, ForwardHeaders};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

#[derive(Debug, Default, Deserialize)]
pub struct InfoQuery {
    /// 要查询的 IP，缺省时查询请求方自身
    pub ip: Option<String>,
}

/// 错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub struct InfoService;

impl InfoService {
    pub async fn get_client_info(
        req: HttpRequest,
        query: web::Query<InfoQuery>,
        service: web::Data<Arc<ClientInfoService>>,
    ) -> impl Responder {
        let request = client_request(&req, query.into_inner().ip);

        match service.get_client_info(&request).await {
            Ok(info) => HttpResponse::Ok().json(info),
            Err(e) => error_response(&e),
        }
    }
}

/// 从 HttpRequest 构造 ClientRequest
pub fn client_request(req: &HttpRequest, override_ip: Option<String>) -> ClientRequest {
    ClientRequest {
        peer: req.peer_addr().map(|addr| addr.to_string()),
        headers: forward_headers(req.headers()),
        override_ip,
    }
}

/// 从 HeaderMap 提取转发相关的头
///
/// 多行 X-Forwarded-For 按出现顺序用逗号拼接。
pub fn forward_headers(headers: &HeaderMap) -> ForwardHeaders {
    let forwarded_for: Vec<&str> = headers
        .get_all(X_FORWARDED_FOR)
        .filter_map(|value| value.to_str().ok())
        .collect();

    ForwardHeaders {
        forwarded_for: (!forwarded_for.is_empty()).then(|| forwarded_for.join(",")),
        real_ip: headers
            .get(X_REAL_IP)
            .and_then(|value| value.to_str().ok())
            .map(String::from),
    }
}

/// 错误 → HTTP 状态码
pub fn error_status(err: &GeoInfoError) -> (StatusCode, &'static str) {
    match err {
        GeoInfoError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, "invalid ip"),
        GeoInfoError::NoResolvableAddress(_) => {
            (StatusCode::BAD_REQUEST, "unable to determine client ip")
        }
        GeoInfoError::GeoLookupMiss(_) => (StatusCode::NOT_FOUND, "GeoIP not found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
    }
}

pub fn error_response(err: &GeoInfoError) -> HttpResponse {
    let (status, message) = error_status(err);

    if status.is_server_error() {
        error!("Client info request failed: {}", err);
    } else {
        debug!("Client info request rejected: {}", err);
    }

    HttpResponse::build(status).json(StatusBody {
        status: message.to_string(),
    })
}

/// Info 路由配置
pub fn info_routes(path: &str) -> actix_web::Resource {
    web::resource(path).route(web::get().to(InfoService::get_client_info))
}
