use crate::domain::events::{DomainEvent, EventKind};
use crate::domain::ports::event_bus::EventBus;
use crate::shared::events::BusStats;
use std::sync::Arc;

/// Events emitted by the verification batch trigger
pub const SAMPLE_BATCH: [(&str, EventKind); 5] = [
    ("1", EventKind::SlotFreed),
    ("YOGA-101", EventKind::ClassFull),
    ("SPINNING-202", EventKind::ScheduleChanged),
    ("3", EventKind::BookingCreated),
    ("4", EventKind::BookingCancelled),
];

/// Entry point for producers (booking and availability collaborators)
#[derive(Clone)]
pub struct EventService {
    event_bus: Arc<dyn EventBus>,
}

impl EventService {
    pub fn new(event_bus: Arc<dyn EventBus>) -> Self {
        Self { event_bus }
    }

    /// Fire-and-forget emission of a class change
    pub fn emit(&self, class_id: impl Into<String>, kind: EventKind) -> DomainEvent {
        let event = DomainEvent::new(class_id, kind);
        tracing::info!("Emitting {} for class {}", event.kind, event.class_id);
        self.event_bus.publish(event.clone());
        event
    }

    /// Emit the fixed verification batch through the regular bus path
    pub fn emit_sample_batch(&self) -> Vec<DomainEvent> {
        SAMPLE_BATCH
            .iter()
            .map(|(class_id, kind)| self.emit(*class_id, *kind))
            .collect()
    }

    pub fn stats(&self) -> BusStats {
        self.event_bus.stats()
    }
}
