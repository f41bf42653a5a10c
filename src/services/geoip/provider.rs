//! GeoIP Provider 抽象层
//!
//! 统一的 GeoIP 查询接口：
//! - 城市查询失败是硬失败（整个请求返回 not found）
//! - ASN 查询失败是软失败（只省略 isp / isp_code 字段）
//! - 可选 Moka 缓存，按 IP 缓存合并后的结果（包括未命中）

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{info, trace, warn};

use super::maxmind::MaxMindProvider;
use crate::config::GeoIpConfig;
use crate::errors::{GeoInfoError, Result};

/// 缓存 TTL 上限（30 天），moka 不接受超过 1000 年的 TTL
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// 城市库查询结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityRecord {
    /// 国家名称（英文）
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "CN", "US")
    pub iso_code: Option<String>,
    /// 城市名称（英文）
    pub city: Option<String>,
}

/// ASN 库查询结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsnRecord {
    pub organization: Option<String>,
    pub number: Option<u32>,
}

/// 合并后的地理位置信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub iso_code: Option<String>,
    pub city: Option<String>,
    pub isp: Option<String>,
    pub isp_code: Option<u32>,
}

impl From<CityRecord> for GeoInfo {
    fn from(record: CityRecord) -> Self {
        Self {
            country: record.country,
            iso_code: record.iso_code,
            city: record.city,
            isp: None,
            isp_code: None,
        }
    }
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// 查询城市信息，没有记录时返回 `GeoLookupMiss`
    async fn city(&self, ip: IpAddr) -> Result<CityRecord>;

    /// 查询 ASN 信息，没有记录或未加载 ASN 库时返回 `AsnLookupMiss`
    async fn asn(&self, ip: IpAddr) -> Result<AsnRecord>;

    /// 是否启用了 ASN 查询
    fn asn_enabled(&self) -> bool;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 统一 GeoIP Provider
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
    /// IP → GeoInfo 缓存（None 为负缓存）
    cache: Option<Cache<IpAddr, Option<GeoInfo>>>,
}

impl GeoIpProvider {
    /// 根据 GeoIpConfig 打开 MaxMind 数据库
    pub fn new(config: &GeoIpConfig) -> Result<Self> {
        let provider = MaxMindProvider::open(&config.city_db_path, config.asn_db_path.as_deref())?;

        if provider.asn_enabled() {
            info!("GeoIP: ASN enrichment enabled");
        } else {
            warn!("GeoIP: No ASN database configured, isp fields will be omitted");
        }

        let provider = Self::with_lookup(Arc::new(provider))
            .with_cache(config.cache_capacity, config.cache_ttl_secs);

        info!("GeoIP: Initialized with {} provider", provider.provider_name());
        Ok(provider)
    }

    /// 使用任意查询实现（不带缓存）
    pub fn with_lookup(inner: Arc<dyn GeoIpLookup>) -> Self {
        Self { inner, cache: None }
    }

    /// 启用缓存，capacity 为 0 时禁用
    pub fn with_cache(mut self, capacity: u64, ttl_secs: u64) -> Self {
        let ttl_secs = if ttl_secs > MAX_CACHE_TTL_SECS {
            warn!(
                "GeoIP: cache_ttl_secs {} exceeds {}, clamping",
                ttl_secs, MAX_CACHE_TTL_SECS
            );
            MAX_CACHE_TTL_SECS
        } else {
            ttl_secs
        };

        self.cache = (capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(capacity)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build()
        });
        self
    }

    /// 查询 IP 的地理位置和网络归属
    pub async fn lookup(&self, ip: IpAddr) -> Result<GeoInfo> {
        let Some(cache) = &self.cache else {
            return self.fetch(ip).await;
        };

        // try_get_with 自带 singleflight 语义；只缓存命中和查无记录，其它错误直接返回
        let cached = cache
            .try_get_with(ip, async {
                trace!("GeoIP cache miss for {}", ip);
                match self.fetch(ip).await {
                    Ok(info) => Ok(Some(info)),
                    Err(GeoInfoError::GeoLookupMiss(reason)) => {
                        trace!("Caching GeoIP miss for {}: {}", ip, reason);
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(|e| (*e).clone())?;

        cached.ok_or_else(|| GeoInfoError::geo_lookup_miss(format!("No GeoIP record for {}", ip)))
    }

    async fn fetch(&self, ip: IpAddr) -> Result<GeoInfo> {
        let mut info = GeoInfo::from(self.inner.city(ip).await?);

        match self.inner.asn(ip).await {
            Ok(asn) => {
                info.isp = asn.organization;
                info.isp_code = asn.number;
            }
            Err(e) if e.is_soft() => trace!("ASN enrichment skipped for {}: {}", ip, e),
            Err(e) => warn!("ASN lookup for {} failed: {}", ip, e),
        }

        Ok(info)
    }

    pub fn asn_enabled(&self) -> bool {
        self.inner.asn_enabled()
    }

    /// 获取当前使用的 provider 名称
    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Clone for GeoIpProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cache: self.cache.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLookup {
        city_calls: AtomicUsize,
        with_asn: bool,
    }

    #[async_trait]
    impl GeoIpLookup for CountingLookup {
        async fn city(&self, ip: IpAddr) -> Result<CityRecord> {
            self.city_calls.fetch_add(1, Ordering::SeqCst);
            if ip.is_loopback() {
                return Err(GeoInfoError::geo_lookup_miss("loopback"));
            }
            if ip.is_unspecified() {
                return Err(GeoInfoError::database_load("reader gone"));
            }
            Ok(CityRecord {
                country: Some("United States".to_string()),
                iso_code: Some("US".to_string()),
                city: None,
            })
        }

        async fn asn(&self, _ip: IpAddr) -> Result<AsnRecord> {
            if !self.with_asn {
                return Err(GeoInfoError::asn_lookup_miss("disabled"));
            }
            Ok(AsnRecord {
                organization: Some("GOOGLE".to_string()),
                number: Some(15169),
            })
        }

        fn asn_enabled(&self) -> bool {
            self.with_asn
        }

        fn name(&self) -> &'static str {
            "Counting"
        }
    }

    fn counting(with_asn: bool) -> Arc<CountingLookup> {
        Arc::new(CountingLookup {
            city_calls: AtomicUsize::new(0),
            with_asn,
        })
    }

    #[tokio::test]
    async fn test_lookup_merges_asn() {
        let provider = GeoIpProvider::with_lookup(counting(true));
        let info = provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        assert_eq!(info.iso_code.as_deref(), Some("US"));
        assert_eq!(info.isp.as_deref(), Some("GOOGLE"));
        assert_eq!(info.isp_code, Some(15169));
    }

    #[tokio::test]
    async fn test_asn_miss_is_soft() {
        let provider = GeoIpProvider::with_lookup(counting(false));
        let info = provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        assert_eq!(info.country.as_deref(), Some("United States"));
        assert!(info.isp.is_none());
        assert!(info.isp_code.is_none());
        assert!(!provider.asn_enabled());
    }

    #[tokio::test]
    async fn test_city_miss_is_hard() {
        let provider = GeoIpProvider::with_lookup(counting(true));
        let err = provider.lookup("127.0.0.1".parse().unwrap()).await.unwrap_err();
        assert!(matches!(err, GeoInfoError::GeoLookupMiss(_)));
    }

    #[tokio::test]
    async fn test_cache_hits_and_negative_cache() {
        let lookup = counting(true);
        let provider = GeoIpProvider::with_lookup(lookup.clone()).with_cache(100, 60);

        let first = provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        let second = provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(lookup.city_calls.load(Ordering::SeqCst), 1);

        for _ in 0..2 {
            let err = provider.lookup("127.0.0.1".parse().unwrap()).await.unwrap_err();
            assert!(matches!(err, GeoInfoError::GeoLookupMiss(_)));
        }
        assert_eq!(lookup.city_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_disables_cache() {
        let lookup = counting(true);
        let provider = GeoIpProvider::with_lookup(lookup.clone()).with_cache(0, 60);

        provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        assert_eq!(lookup.city_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_cached() {
        let lookup = counting(true);
        let provider = GeoIpProvider::with_lookup(lookup.clone()).with_cache(100, 60);

        for _ in 0..2 {
            let err = provider.lookup("0.0.0.0".parse().unwrap()).await.unwrap_err();
            assert!(matches!(err, GeoInfoError::DatabaseLoad(_)));
        }
        assert_eq!(lookup.city_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_clamped() {
        let lookup = counting(true);
        let provider = GeoIpProvider::with_lookup(lookup.clone()).with_cache(100, u64::MAX);

        provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        provider.lookup("8.8.8.8".parse().unwrap()).await.unwrap();
        assert_eq!(lookup.city_calls.load(Ordering::SeqCst), 1);
    }
}
