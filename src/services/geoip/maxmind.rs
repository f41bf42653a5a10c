//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 GeoLite2-City.mmdb（必需）和 GeoLite2-ASN.mmdb（可选）进行查询

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::{Reader, geoip2};
use tracing::trace;

use super::provider::{AsnRecord, CityRecord, GeoIpLookup};
use crate::errors::{GeoInfoError, Result};

/// MaxMind GeoIP Provider
pub struct MaxMindProvider {
    city_reader: Arc<Reader<Vec<u8>>>,
    asn_reader: Option<Arc<Reader<Vec<u8>>>>,
}

impl MaxMindProvider {
    /// 打开城市库，以及可选的 ASN 库
    pub fn open(city_path: &str, asn_path: Option<&str>) -> Result<Self> {
        let city_reader = Self::open_reader(city_path)?;
        let asn_reader = asn_path
            .filter(|path| !path.is_empty())
            .map(Self::open_reader)
            .transpose()?;

        Ok(Self {
            city_reader: Arc::new(city_reader),
            asn_reader: asn_reader.map(Arc::new),
        })
    }

    fn open_reader(path: &str) -> Result<Reader<Vec<u8>>> {
        Reader::open_readfile(path).map_err(|e| {
            GeoInfoError::database_load(format!("Failed to open MaxMind database {}: {}", path, e))
        })
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindProvider {
    async fn city(&self, ip: IpAddr) -> Result<CityRecord> {
        let miss = |reason: String| GeoInfoError::geo_lookup_miss(format!("{}: {}", ip, reason));

        let result = self
            .city_reader
            .lookup(ip)
            .map_err(|e| miss(e.to_string()))?;
        let record: Option<geoip2::City> = result.decode().map_err(|e| miss(e.to_string()))?;
        let city = record.ok_or_else(|| miss("no city record".to_string()))?;

        let record = CityRecord {
            country: city.country.names.english.map(String::from),
            iso_code: city.country.iso_code.map(String::from),
            city: city.city.names.english.map(String::from),
        };

        trace!(
            "MaxMind city lookup for {}: country={:?}, city={:?}",
            ip, record.iso_code, record.city
        );

        Ok(record)
    }

    async fn asn(&self, ip: IpAddr) -> Result<AsnRecord> {
        let miss = |reason: String| GeoInfoError::asn_lookup_miss(format!("{}: {}", ip, reason));

        let Some(reader) = &self.asn_reader else {
            return Err(miss("ASN database not loaded".to_string()));
        };

        let result = reader.lookup(ip).map_err(|e| miss(e.to_string()))?;
        let record: Option<geoip2::Asn> = result.decode().map_err(|e| miss(e.to_string()))?;
        let asn = record.ok_or_else(|| miss("no ASN record".to_string()))?;

        if asn.autonomous_system_number.is_none() && asn.autonomous_system_organization.is_none() {
            return Err(miss("empty ASN record".to_string()));
        }

        trace!(
            "MaxMind ASN lookup for {}: AS{:?} {:?}",
            ip, asn.autonomous_system_number, asn.autonomous_system_organization
        );

        Ok(AsnRecord {
            organization: asn.autonomous_system_organization.map(String::from),
            number: asn.autonomous_system_number,
        })
    }

    fn asn_enabled(&self) -> bool {
        self.asn_reader.is_some()
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
