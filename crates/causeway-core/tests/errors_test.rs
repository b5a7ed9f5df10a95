//! Tests for the error taxonomy and error codes.

use std::time::Duration;

use causeway_core::errors::error_code;
use causeway_core::errors::*;

#[test]
fn every_error_has_a_code() {
    let errors: Vec<CausewayError> = vec![
        PayloadError::NotAnObject.into(),
        WaitError::Abandoned {
            reason: AbandonReason::Cancelled,
            blocked_on: "users:3".into(),
            attempts: 2,
            waited: Duration::from_millis(20),
        }
        .into(),
        StoreError::Conflict {
            key: "users".into(),
            expected: 2,
            found: 5,
        }
        .into(),
        StoreError::backend("disk full").into(),
        TransportError::AckFailed {
            reason: "channel reset".into(),
        }
        .into(),
        ConfigError::FileNotFound { path: "/tmp".into() }.into(),
    ];

    for error in &errors {
        assert!(!error.error_code().is_empty());
    }
}

#[test]
fn aggregate_codes_delegate_to_subsystems() {
    let conflict: CausewayError = StoreError::Conflict {
        key: "k".into(),
        expected: 1,
        found: 3,
    }
    .into();
    assert_eq!(conflict.error_code(), error_code::APPLY_CONFLICT);

    let backend: CausewayError = StoreError::backend("boom").into();
    assert_eq!(backend.error_code(), error_code::STORE_ERROR);

    let malformed: CausewayError = PayloadError::MissingField {
        field: "__amqp__".into(),
    }
    .into();
    assert_eq!(malformed.error_code(), error_code::MALFORMED_PAYLOAD);

    let ack: CausewayError = TransportError::AckFailed {
        reason: "socket closed".into(),
    }
    .into();
    assert_eq!(ack.error_code(), error_code::ACK_TRANSPORT_ERROR);
}

#[test]
fn coded_string_prefixes_code() {
    let err = PayloadError::MissingField {
        field: "timestamp".into(),
    };
    assert_eq!(
        err.coded_string(),
        "[MALFORMED_PAYLOAD] missing required field: timestamp"
    );
}

#[test]
fn wait_error_exposes_reason() {
    let err = WaitError::Abandoned {
        reason: AbandonReason::TimedOut,
        blocked_on: "orders:9".into(),
        attempts: 7,
        waited: Duration::from_secs(3),
    };
    assert_eq!(err.reason(), AbandonReason::TimedOut);
    assert!(err.to_string().contains("timed out"));
    assert!(err.to_string().contains("orders:9"));
}
