//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::{PortError, TemporalError};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_from_temporal_error() {
    let temporal = TemporalError::UnknownTimezone("Mars/Olympus".to_string());
    let core_error: CoreError = temporal.into();

    assert!(matches!(core_error, CoreError::Temporal(_)));
    assert!(core_error.to_string().contains("Mars/Olympus"));
}

#[test]
fn test_core_error_validation_display() {
    let error = CoreError::validation("district 'DST-x' is malformed");
    assert_eq!(error.to_string(), "Validation error: district 'DST-x' is malformed");
}

mod port_error {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = PortError::not_found("Claim", "CLM-1");
        assert_eq!(error.to_string(), "Not found: Claim with id CLM-1");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        assert!(PortError::connection("reset by peer").is_transient());
        assert!(PortError::unavailable("change-log").is_transient());
        assert!(!PortError::conflict("duplicate id").is_transient());
    }
}
