//! Integration tests for evently-core infrastructure

use chrono::Utc;
use evently_core::{
    config_error, decide, storage_error, Admission, AdmissionError, BootstrapAdmin, ErrorContext,
    Event, EventSnapshot, EventlyConfig, EventlyError, LogFormat, RsvpIntent, RsvpRecord,
    Requester,
};

fn event(is_public: bool, requires_admin: bool, capacity: Option<u32>) -> Event {
    Event {
        id: 1,
        title: "Integration".to_string(),
        description: None,
        date: Utc::now(),
        location: None,
        capacity,
        is_public,
        requires_admin,
        created_by: None,
        created_at: Utc::now(),
    }
}

fn attending_records(count: usize) -> Vec<RsvpRecord> {
    (0..count)
        .map(|i| RsvpRecord {
            id: i as i64 + 1,
            event_id: 1,
            user_id: Some(100 + i as i64),
            attending: true,
            created_at: Utc::now(),
        })
        .collect()
}

fn requesters() -> Vec<Requester> {
    vec![
        Requester::Anonymous,
        Requester::user(1),
        Requester::admin(2),
        Requester::user(100),
    ]
}

#[test]
fn test_policy_matrix_follows_priority_order() {
    for is_public in [true, false] {
        for requires_admin in [true, false] {
            for capacity in [None, Some(1), Some(3)] {
                for filled in [0usize, 1, 3] {
                    for requester in requesters() {
                        for intent in [RsvpIntent::attending(), RsvpIntent::declining()] {
                            let snapshot = EventSnapshot::new(
                                event(is_public, requires_admin, capacity),
                                attending_records(filled),
                            );
                            let result = decide(&snapshot, &requester, intent);

                            let anonymous = requester == Requester::Anonymous;
                            let expected = if (!is_public || requires_admin) && anonymous {
                                Some(AdmissionError::AuthenticationRequired)
                            } else if requires_admin && !requester.is_admin() {
                                Some(AdmissionError::AdminRequired)
                            } else if capacity.is_some_and(|c| filled >= c as usize) {
                                Some(AdmissionError::CapacityExceeded {
                                    capacity: capacity.unwrap(),
                                    attending: filled,
                                })
                            } else {
                                None
                            };

                            match (expected, result) {
                                (Some(expected), Err(actual)) => assert_eq!(expected, actual),
                                (None, Ok(Admission::Update(record))) => {
                                    assert_eq!(record.user_id, requester.user_id());
                                    assert_eq!(record.attending, intent.attending);
                                }
                                (None, Ok(Admission::Create(rsvp))) => {
                                    assert_eq!(rsvp.user_id, requester.user_id());
                                    assert_eq!(rsvp.attending, intent.attending);
                                    assert_eq!(rsvp.event_id, 1);
                                }
                                (expected, actual) => panic!(
                                    "public={is_public} admin={requires_admin} capacity={capacity:?} \
                                     filled={filled} requester={requester:?}: expected {expected:?}, got {actual:?}"
                                ),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_error_handling() {
    let error = storage_error!("disk full", "sqlite_storage");
    match &error {
        EventlyError::Storage {
            message, context, ..
        } => {
            assert_eq!(message, "disk full");
            assert_eq!(context.component, "sqlite_storage");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Storage error"),
    }
    assert!(error.is_recoverable());

    // Should not panic
    error.log();

    let config_error = config_error!("Invalid config", "test");
    assert!(!config_error.is_recoverable());

    let context = ErrorContext::new("test").with_operation("op");
    assert_eq!(context.operation.as_deref(), Some("op"));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evently.toml");

    let mut config = EventlyConfig::default();
    config.server.port = 7070;
    config.database.url = "memory".to_string();
    config.logging.format = LogFormat::Json;
    config.auth.bootstrap_admin = Some(BootstrapAdmin {
        username: "admin".to_string(),
        password: "admin-password".to_string(),
    });

    config.save_to_file(&path).unwrap();
    let loaded = EventlyConfig::from_file(&path).unwrap();

    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = EventlyConfig::from_file(dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(EventlyError::Config { .. })));

    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[server\nport = ").unwrap();
    let broken = EventlyConfig::from_file(&path);
    match broken {
        Err(EventlyError::Config { context, .. }) => {
            assert_eq!(context.operation.as_deref(), Some("parse_toml"));
        }
        other => panic!("Expected config error, got {other:?}"),
    }
}
