use std::time::Duration;

use huginn::cache::CacheError;
use huginn::{HuginnError, Result};

#[test]
fn test_error_display() {
    let err = HuginnError::malformed("color_grid: RLE payload covers 3 of 4 cells");
    assert!(err.to_string().contains("3 of 4 cells"));
    assert!(err.to_string().starts_with("malformed response"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(HuginnError::Configuration("bad mode".into()))
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Kind classification
// ============================================================================

#[test]
fn network_errors() {
    assert!(HuginnError::Http("connection reset".into()).is_network());
    assert!(
        HuginnError::Api {
            status: 404,
            message: "missing".into()
        }
        .is_network()
    );
    assert!(HuginnError::RateLimited { retry_after: None }.is_network());
    assert!(!HuginnError::malformed("x").is_network());
    assert!(!HuginnError::Configuration("x".into()).is_network());
}

#[test]
fn malformed_errors() {
    assert!(HuginnError::malformed("x").is_malformed());
    assert!(!HuginnError::Http("x".into()).is_malformed());
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(HuginnError::RateLimited { retry_after: None }.is_transient());
    assert!(HuginnError::Http("connection reset".into()).is_transient());
    assert!(
        HuginnError::Api {
            status: 500,
            message: "internal".into()
        }
        .is_transient()
    );
    assert!(
        HuginnError::Api {
            status: 502,
            message: "bad gateway".into()
        }
        .is_transient()
    );
}

#[test]
fn permanent_errors() {
    assert!(
        !HuginnError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_transient()
    );
    assert!(!HuginnError::malformed("x").is_transient());
    assert!(!HuginnError::Configuration("x".into()).is_transient());
}

#[test]
fn retry_after_only_from_rate_limit() {
    let hint = Duration::from_secs(3);
    assert_eq!(
        HuginnError::RateLimited {
            retry_after: Some(hint)
        }
        .retry_after(),
        Some(hint)
    );
    assert_eq!(HuginnError::Http("x".into()).retry_after(), None);
}

#[test]
fn cache_errors_are_distinct() {
    let err = CacheError::NotFound("abc".into());
    assert!(err.to_string().contains("abc"));
    assert_eq!(CacheError::Poisoned.to_string(), "cache lock poisoned");
}
