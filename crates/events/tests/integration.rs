//! Integration tests for events

#[cfg(test)]
mod tests {
    use maid_events::*;

    #[tokio::test]
    async fn test_event_emitter() {
        let (tx, mut rx) = channel();

        tx.emit_record(RecordEvent::Saved {
            entity: "document".into(),
            record_id: 1,
            created: true,
        });
        tx.emit_cleanup(CleanupEvent::PreviousVersionMissing {
            entity: "document".into(),
            record_id: 1,
        });

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            AppEvent::Record(RecordEvent::Saved { created: true, .. })
        ));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            AppEvent::Cleanup(CleanupEvent::PreviousVersionMissing { record_id: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_record(RecordEvent::Deleted {
            entity: "document".into(),
            record_id: 1,
        });
    }

    #[test]
    fn test_absent_sender_is_silent() {
        let sender: Option<EventSender> = None;
        sender.emit_cleanup(CleanupEvent::FieldSkipped {
            entity: "document".into(),
            field: "attachment".into(),
            reason: SkipReason::UnknownField,
        });
    }

    #[test]
    fn test_cleanup_event_serialization() {
        let event = AppEvent::Cleanup(CleanupEvent::FileRetained {
            entity: "document".into(),
            record_id: Some(3),
            field: "attachment".into(),
            name: "a.txt".into(),
            reason: RetainReason::Shared,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "cleanup");
        assert_eq!(json["event"]["type"], "FileRetained");
        assert_eq!(json["event"]["reason"], "shared");
    }

    #[test]
    fn test_log_levels() {
        let deleted = AppEvent::Cleanup(CleanupEvent::FileDeleted {
            entity: "document".into(),
            record_id: Some(1),
            field: "attachment".into(),
            name: "a.txt".into(),
        });
        assert_eq!(deleted.log_level(), tracing::Level::INFO);
        assert_eq!(deleted.log_target(), "maid::events::cleanup");

        let missing = AppEvent::Cleanup(CleanupEvent::PreviousVersionMissing {
            entity: "document".into(),
            record_id: 1,
        });
        assert_eq!(missing.log_level(), tracing::Level::WARN);

        let saved = AppEvent::Record(RecordEvent::Saved {
            entity: "document".into(),
            record_id: 1,
            created: true,
        });
        assert_eq!(saved.log_level(), tracing::Level::DEBUG);
        log_event(&saved);
    }
}
