//! GeoIP 服务模块
//!
//! 提供 IP 地址地理位置与网络归属查询：
//! - MaxMind GeoLite2-City 本地数据库（国家、城市）
//! - MaxMind GeoLite2-ASN 本地数据库（运营商、AS 号，可选）

mod maxmind;
mod provider;

pub use maxmind::MaxMindProvider;
pub use provider::{AsnRecord, CityRecord, GeoInfo, GeoIpLookup, GeoIpProvider};
