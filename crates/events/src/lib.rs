#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for maid
//!
//! Library crates never print. Everything observable about record
//! persistence and file cleanup is emitted as an [`AppEvent`] through an
//! optional [`EventSender`]; the embedding application decides whether to
//! collect the events, forward them to `tracing` with [`log_event`], or drop
//! them.

pub mod events;
pub use events::{AppEvent, CleanupEvent, RecordEvent, RetainReason, SkipReason};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace, warn};

/// Type alias for event sender using the `AppEvent` system
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver using the `AppEvent` system
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel with the `AppEvent` system
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout maid
///
/// Implemented for the raw `EventSender` and for any component that may or
/// may not carry one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a cleanup decision
    fn emit_cleanup(&self, event: CleanupEvent) {
        self.emit(AppEvent::Cleanup(event));
    }

    /// Emit a record lifecycle notification
    fn emit_record(&self, event: RecordEvent) {
        self.emit(AppEvent::Record(event));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}

/// Forward an event to `tracing` at the level the event asks for.
pub fn log_event(event: &AppEvent) {
    let domain = event.log_target();
    match event.log_level() {
        tracing::Level::WARN => warn!(target: "maid::events", domain, event = ?event),
        tracing::Level::INFO => info!(target: "maid::events", domain, event = ?event),
        tracing::Level::DEBUG => debug!(target: "maid::events", domain, event = ?event),
        _ => trace!(target: "maid::events", domain, event = ?event),
    }
}
