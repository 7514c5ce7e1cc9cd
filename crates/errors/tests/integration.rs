//! Integration tests for error types

#[cfg(test)]
mod tests {
    use maid_errors::*;

    #[test]
    fn test_error_conversion() {
        let state_err = StateError::UnknownEntity {
            entity: "document".into(),
        };
        let err: Error = state_err.into();
        assert!(matches!(err, Error::State(_)));
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::InvalidPath {
            name: "../etc/passwd".into(),
        };
        assert_eq!(err.to_string(), "invalid file name: ../etc/passwd");
    }

    #[test]
    fn test_error_clone() {
        let err = StateError::RecordNotFound {
            entity: "document".into(),
            id: 7,
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
        assert_eq!(cloned.to_string(), "record not found: document#7");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::PermissionDenied { .. }));
    }

    #[test]
    fn test_io_error_with_path_maps_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StorageError::from_io_with_path(&io_err, std::path::Path::new("a.txt"));
        assert!(matches!(err, StorageError::PathNotFound { name } if name == "a.txt"));
    }

    #[test]
    fn test_user_facing_codes_bubble_up() {
        let err: Error = StorageError::IoError {
            message: "disk hiccup".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("storage.io_error"));
        assert!(err.is_retryable());

        let err: Error = RegistryError::UnknownEntity {
            entity: "ghost".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("registry.unknown_entity"));
        assert!(!err.is_retryable());
        assert!(err.user_hint().is_some());
    }

    #[test]
    fn test_state_error_codes() {
        let cases = [
            (
                StateError::DatabaseError {
                    message: "locked".into(),
                },
                "state.database",
                true,
            ),
            (
                StateError::MigrationFailed {
                    message: "bad sql".into(),
                },
                "state.migration_failed",
                false,
            ),
            (
                StateError::RecordNotFound {
                    entity: "document".into(),
                    id: 1,
                },
                "state.record_not_found",
                false,
            ),
            (
                StateError::UnknownEntity {
                    entity: "ghost".into(),
                },
                "state.unknown_entity",
                false,
            ),
            (
                StateError::MissingIdentity {
                    entity: "document".into(),
                },
                "state.missing_identity",
                false,
            ),
        ];

        for (err, code, retryable) in cases {
            assert_eq!(err.user_code(), Some(code));
            assert_eq!(err.is_retryable(), retryable, "{code}");
        }
    }

    #[test]
    fn test_sqlx_error_becomes_database_error() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(
            err,
            Error::State(StateError::DatabaseError { .. })
        ));
        assert_eq!(err.user_code(), Some("state.database"));
    }
}
