//! Run-time change notifications of a constructed registry.
//!
//! Attaching, detaching, property updates, language switches and module
//! toggles each leave a [`RegistryEvent`] in the registry's [`EventLog`].
//! Suppressed kinds are never recorded.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

/// A state change on a constructed registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A record was attached to a domain list as a new value.
    ValueAttached {
        list: String,
        code: String,
        index: u32,
        source: Option<PathBuf>,
    },
    /// Re-attaching a source file replaced its previous value.
    ValueReplaced {
        list: String,
        old_code: String,
        code: String,
        index: u32,
    },
    ValueDetached {
        list: String,
        code: String,
    },
    PropertyUpdated {
        name: String,
        value: String,
    },
    LanguageChanged {
        from: String,
        to: String,
    },
    ModuleToggled {
        module: String,
        active: bool,
    },
}

/// Discriminant tag for event types, used for suppression and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryEventKind {
    ValueAttached,
    ValueReplaced,
    ValueDetached,
    PropertyUpdated,
    LanguageChanged,
    ModuleToggled,
}

const EVENT_KIND_COUNT: usize = 6;

impl RegistryEvent {
    pub fn kind(&self) -> RegistryEventKind {
        match self {
            RegistryEvent::ValueAttached { .. } => RegistryEventKind::ValueAttached,
            RegistryEvent::ValueReplaced { .. } => RegistryEventKind::ValueReplaced,
            RegistryEvent::ValueDetached { .. } => RegistryEventKind::ValueDetached,
            RegistryEvent::PropertyUpdated { .. } => RegistryEventKind::PropertyUpdated,
            RegistryEvent::LanguageChanged { .. } => RegistryEventKind::LanguageChanged,
            RegistryEvent::ModuleToggled { .. } => RegistryEventKind::ModuleToggled,
        }
    }
}

/// Bounded log of registry events, oldest first.
///
/// Once `capacity` events are held, each new event pushes out the oldest one
/// and counts it as dropped. Draining or clearing the log does not reset the
/// counters.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<RegistryEvent>,
    capacity: usize,
    recorded: u64,
    dropped: u64,
    suppressed: HashSet<RegistryEventKind>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventLog {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            recorded: 0,
            dropped: 0,
            suppressed: HashSet::new(),
        }
    }

    /// Append `event` unless its kind is suppressed.
    pub fn record(&mut self, event: RegistryEvent) {
        if self.suppressed.contains(&event.kind()) {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
        self.recorded += 1;
    }

    pub fn suppress(&mut self, kind: RegistryEventKind) {
        self.suppressed.insert(kind);
    }

    pub fn unsuppress(&mut self, kind: RegistryEventKind) {
        self.suppressed.remove(&kind);
    }

    pub fn is_suppressed(&self, kind: RegistryEventKind) -> bool {
        self.suppressed.contains(&kind)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events accepted since creation, whether still held or not.
    pub fn total_recorded(&self) -> u64 {
        self.recorded
    }

    /// Events pushed out by newer ones while the log was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &RegistryEvent> + '_ {
        self.events.iter()
    }

    /// Take every held event, oldest first.
    pub fn drain(&mut self) -> Vec<RegistryEvent> {
        self.events.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggled(module: &str, active: bool) -> RegistryEvent {
        RegistryEvent::ModuleToggled {
            module: module.into(),
            active,
        }
    }

    #[test]
    fn record_and_iterate_oldest_first() {
        let mut log = EventLog::new(8);
        log.record(toggled("surface", false));
        log.record(toggled("surface", true));

        assert_eq!(log.len(), 2);
        assert_eq!(log.total_recorded(), 2);
        assert_eq!(log.dropped_count(), 0);

        let events: Vec<&RegistryEvent> = log.iter().collect();
        assert_eq!(events[0], &toggled("surface", false));
        assert_eq!(events[1], &toggled("surface", true));
    }

    #[test]
    fn ring_wraps_and_drops_oldest() {
        let mut log = EventLog::new(3);
        for name in ["a", "b", "c", "d", "e"] {
            log.record(toggled(name, true));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.dropped_count(), 2);
        let names: Vec<String> = log
            .iter()
            .map(|e| match e {
                RegistryEvent::ModuleToggled { module, .. } => module.clone(),
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["c", "d", "e"]);
    }

    #[test]
    fn drain_empties_the_log_in_order() {
        let mut log = EventLog::new(2);
        log.record(toggled("a", true));
        log.record(toggled("b", true));
        log.record(toggled("c", true));
        let drained = log.drain();
        assert_eq!(drained, vec![toggled("b", true), toggled("c", true)]);
        assert!(log.is_empty());
        assert_eq!(log.iter().len(), 0);

        log.record(toggled("d", false));
        assert_eq!(log.drain(), vec![toggled("d", false)]);
    }

    #[test]
    fn draining_does_not_count_later_events_as_dropped() {
        let mut log = EventLog::new(2);
        log.record(toggled("a", true));
        log.record(toggled("b", true));
        assert_eq!(log.drain().len(), 2);

        log.record(toggled("c", true));
        log.record(toggled("d", true));
        assert_eq!(log.dropped_count(), 0);
        assert_eq!(log.total_recorded(), 4);

        log.record(toggled("e", true));
        assert_eq!(log.dropped_count(), 1);
        assert_eq!(log.drain(), vec![toggled("d", true), toggled("e", true)]);
    }

    #[test]
    fn suppressed_kinds_are_not_recorded() {
        let mut log = EventLog::new(4);
        log.suppress(RegistryEventKind::ModuleToggled);
        log.record(toggled("a", true));
        log.record(RegistryEvent::LanguageChanged {
            from: "en_US".into(),
            to: "es_MX".into(),
        });
        assert_eq!(log.len(), 1);
        assert!(log.is_suppressed(RegistryEventKind::ModuleToggled));

        log.unsuppress(RegistryEventKind::ModuleToggled);
        log.record(toggled("a", true));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut log = EventLog::new(0);
        assert_eq!(log.capacity(), 1);
        log.record(toggled("a", true));
        log.record(toggled("b", true));
        assert_eq!(log.len(), 1);
        assert_eq!(log.dropped_count(), 1);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.dropped_count(), 1);
    }

    #[test]
    fn kind_matches_variant() {
        let e = RegistryEvent::ValueDetached {
            list: "FuelModelList".into(),
            code: "14".into(),
        };
        assert_eq!(e.kind(), RegistryEventKind::ValueDetached);
    }
}
