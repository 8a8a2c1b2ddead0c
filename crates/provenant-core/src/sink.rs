use crate::events::RegistryEvent;

/// Failure reported by an [`EventSink`].
#[derive(thiserror::Error, Debug)]
#[error("event sink rejected event {seq}: {reason}")]
pub struct SinkError {
    /// Sequence number of the event that could not be recorded.
    pub seq: u64,
    /// Backend-specific reason.
    pub reason: String,
}

impl SinkError {
    /// Wraps a backend error for the event at `seq`.
    pub fn new(seq: u64, reason: impl ToString) -> Self {
        Self {
            seq,
            reason: reason.to_string(),
        }
    }
}

/// Destination for committed registry events.
///
/// The registry calls [`EventSink::record`] before applying a mutation. If
/// the sink fails, the mutation is abandoned, so every applied change has
/// exactly one recorded event.
pub trait EventSink {
    /// Durably records `event`.
    fn record(&mut self, event: &RegistryEvent) -> Result<(), SinkError>;
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn record(&mut self, event: &RegistryEvent) -> Result<(), SinkError> {
        (**self).record(event)
    }
}

/// In-memory sink that keeps every event in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Vec<RegistryEvent>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Consumes the sink, returning its events.
    pub fn into_events(self) -> Vec<RegistryEvent> {
        self.events
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &RegistryEvent) -> Result<(), SinkError> {
        self.events.push(event.clone());
        Ok(())
    }
}
