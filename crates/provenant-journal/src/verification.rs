use crate::errors::JournalError;
use provenant_canonical::Digest;
use provenant_core::RegistryEvent;
use serde::Serialize;

/// A problem found at one position of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainFault {
    /// Sequence number claimed by the faulty event.
    pub seq: u64,
    /// 1-based position of the event in the journal.
    pub position: u64,
    /// What is wrong.
    pub reason: String,
}

/// Outcome of [`verify_chain`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    /// Number of events read.
    pub events: u64,
    /// Identifier of the last event read.
    pub tip: Option<Digest>,
    /// Every fault found, in journal order.
    pub faults: Vec<ChainFault>,
}

impl ChainReport {
    /// Returns true if no fault was found.
    pub fn is_intact(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Checks every event's id, its sequence number and its link to the
/// preceding event.
///
/// Faults are collected rather than returned early so one audit reports
/// every damaged position. Structural problems (bad frames, JSON that is not
/// an event) still abort with an error.
pub fn verify_chain<I>(events: I) -> Result<ChainReport, JournalError>
where
    I: IntoIterator<Item = Result<RegistryEvent, JournalError>>,
{
    let mut report = ChainReport::default();
    let mut expected_prev: Option<Digest> = None;

    for event in events {
        let event = event?;
        report.events += 1;
        let position = report.events;
        let mut fault = |reason: String| {
            report.faults.push(ChainFault {
                seq: event.seq,
                position,
                reason,
            })
        };

        match event.verify_id() {
            Ok(true) => {}
            Ok(false) => fault("event_id does not match event content".to_string()),
            Err(e) => fault(format!("event_id could not be computed: {}", e)),
        }
        if event.seq != position {
            fault(format!("expected seq {}, found {}", position, event.seq));
        }
        if event.prev_event_id != expected_prev {
            fault("prev_event_id does not name the preceding event".to_string());
        }

        expected_prev = Some(event.event_id.clone());
        report.tip = Some(event.event_id);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenant_canonical::{Identity, Timestamp};
    use provenant_core::{ChainTip, EventPayload};

    fn chain(len: usize) -> Vec<RegistryEvent> {
        let admin = Identity::parse("org:registry").unwrap();
        let at = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        let mut tip = ChainTip::default();
        let mut events = Vec::new();
        for i in 0..len {
            let payload = if i == 0 {
                EventPayload::RegistryCreated {
                    admin: admin.clone(),
                }
            } else {
                EventPayload::VerifierAuthorized {
                    verifier: Identity::parse(format!("human:v{}", i)).unwrap(),
                    admin: admin.clone(),
                }
            };
            let event = tip.next(at.clone(), admin.clone(), payload).unwrap();
            tip.advance(&event);
            events.push(event);
        }
        events
    }

    #[test]
    fn intact_chain_has_no_faults() {
        let events = chain(4);
        let tip = events[3].event_id.clone();
        let report = verify_chain(events.into_iter().map(Ok)).unwrap();
        assert!(report.is_intact());
        assert_eq!(report.events, 4);
        assert_eq!(report.tip, Some(tip));
    }

    #[test]
    fn edited_event_is_reported() {
        let mut events = chain(3);
        events[1].actor = Identity::parse("human:mallory").unwrap();
        let report = verify_chain(events.into_iter().map(Ok)).unwrap();
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].seq, 2);
        assert!(report.faults[0].reason.contains("event_id"));
    }

    #[test]
    fn dropped_event_breaks_links() {
        let mut events = chain(4);
        events.remove(1);
        let report = verify_chain(events.into_iter().map(Ok)).unwrap();
        assert!(!report.is_intact());
        assert!(report.faults.iter().all(|f| f.position == 2));
        assert_eq!(report.faults.len(), 2);
    }

    #[test]
    fn read_errors_abort() {
        let events = vec![Err(JournalError::TruncatedFrame { offset: 16 })];
        assert!(verify_chain(events).is_err());
    }
}
