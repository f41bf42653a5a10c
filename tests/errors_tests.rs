use geoinfo::api::services::info::error_status;
use geoinfo::errors::{GeoInfoError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_invalid_address_error() {
        let error = GeoInfoError::invalid_address("not-an-ip");

        assert!(matches!(error, GeoInfoError::InvalidAddress(_)));
        assert_eq!(error.code(), "E001");
        assert!(error.to_string().contains("Invalid Address"));
        assert!(error.to_string().contains("not-an-ip"));
    }

    #[test]
    fn test_no_resolvable_address_error() {
        let error = GeoInfoError::no_resolvable_address("no peer");

        assert!(matches!(error, GeoInfoError::NoResolvableAddress(_)));
        assert!(error.to_string().contains("No Resolvable Address"));
        assert!(error.to_string().contains("no peer"));
    }

    #[test]
    fn test_geo_lookup_miss_error() {
        let error = GeoInfoError::geo_lookup_miss("192.0.2.1");

        assert!(matches!(error, GeoInfoError::GeoLookupMiss(_)));
        assert!(error.to_string().contains("GeoIP Record Not Found"));
        assert!(!error.is_soft());
    }

    #[test]
    fn test_asn_lookup_miss_error() {
        let error = GeoInfoError::asn_lookup_miss("192.0.2.1");

        assert!(matches!(error, GeoInfoError::AsnLookupMiss(_)));
        assert!(error.to_string().contains("ASN Record Not Found"));
        assert!(error.is_soft());
    }

    #[test]
    fn test_database_load_error() {
        let error = GeoInfoError::database_load("/data/GeoLite2-City.mmdb");

        assert!(matches!(error, GeoInfoError::DatabaseLoad(_)));
        assert_eq!(error.message(), "/data/GeoLite2-City.mmdb");
    }

    #[test]
    fn test_format_simple() {
        let error = GeoInfoError::configuration("bad port");
        assert_eq!(error.format_simple(), "Configuration Error: bad port");
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let error: GeoInfoError = io_error.into();

        assert!(matches!(error, GeoInfoError::FileOperation(_)));
        assert!(error.to_string().contains("file missing"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let error: GeoInfoError = json_error.into();

        assert!(matches!(error, GeoInfoError::Serialization(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn read_missing() -> Result<Vec<u8>> {
            Ok(std::fs::read("/nonexistent/geoinfo/GeoLite2-City.mmdb")?)
        }

        let error = read_missing().unwrap_err();
        assert!(matches!(error, GeoInfoError::FileOperation(_)));
    }

    #[test]
    fn test_error_trait() {
        let error = GeoInfoError::geo_lookup_miss("x");
        let dyn_error: &dyn Error = &error;
        assert!(dyn_error.source().is_none());
    }
}

#[cfg(test)]
mod error_status_tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(
            error_status(&GeoInfoError::invalid_address("x")),
            (StatusCode::BAD_REQUEST, "invalid ip")
        );
        assert_eq!(
            error_status(&GeoInfoError::no_resolvable_address("x")),
            (StatusCode::BAD_REQUEST, "unable to determine client ip")
        );
    }

    #[test]
    fn test_miss_is_not_found() {
        assert_eq!(
            error_status(&GeoInfoError::geo_lookup_miss("x")),
            (StatusCode::NOT_FOUND, "GeoIP not found")
        );
    }

    #[test]
    fn test_everything_else_is_internal() {
        for error in [
            GeoInfoError::database_load("x"),
            GeoInfoError::configuration("x"),
            GeoInfoError::file_operation("x"),
            GeoInfoError::serialization("x"),
            GeoInfoError::asn_lookup_miss("x"),
        ] {
            assert_eq!(
                error_status(&error),
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            );
        }
    }
}
