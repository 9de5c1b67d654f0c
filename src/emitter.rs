//! Delivery of events to a [`LogSink`].
//!
//! [`Emitter::raise`] checks the sink first and returns immediately when the
//! severity is inactive: no properties are merged, no identifier is derived
//! and the sink is not called. Otherwise the event's properties and the
//! call-site extras are merged (PascalCase keys, extras win), and exactly one
//! record named after the event is written inside a scope carrying them.
//!
//! ```rust
//! use herald::{Emitter, EventData, MemorySink, Properties, Severity};
//!
//! let sink = MemorySink::new();
//! let emitter = Emitter::new(sink.clone());
//! let event = EventData::new("Created").unwrap();
//!
//! let mut extra = Properties::new();
//! extra.insert("orderId".into(), 42.into());
//! emitter.raise(&event, Severity::Information, Some(&extra)).unwrap();
//!
//! let records = sink.records();
//! let record = &records[0];
//! assert_eq!(record.message, event.name());
//! assert!(record.properties.contains_key("OrderId"));
//! ```

use crate::event::Event;
use crate::properties::{merge_properties, Properties};
use crate::severity::Severity;
use crate::sink::{EventId, LogSink};

/// Anything events can be raised on.
pub trait Raise {
    /// Failure reported by the underlying sink.
    type Error;

    /// Emit `event` at `severity`, layering `extra` over its properties.
    fn raise<E: Event + ?Sized>(
        &self,
        event: &E,
        severity: Severity,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error>;
}

/// Emits events onto a sink.
///
/// Holds no mutable state, so one emitter can be shared across threads when
/// its sink can.
#[derive(Debug, Clone, Default)]
pub struct Emitter<S> {
    sink: S,
}

impl<S: LogSink> Emitter<S> {
    /// Wrap `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// The wrapped sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Whether the sink is active at `severity`.
    pub fn is_enabled(&self, severity: Severity) -> bool {
        self.sink.is_enabled(severity)
    }

    /// Identifier derived for an event name.
    pub fn event_id(name: &str) -> EventId {
        EventId::from_name(name)
    }

    /// Emit `event` at `severity`, layering `extra` over its properties.
    ///
    /// Neither `event` nor `extra` is modified.
    ///
    /// # Errors
    ///
    /// Whatever the sink's `log` returns, unchanged.
    pub fn raise<E: Event + ?Sized>(
        &self,
        event: &E,
        severity: Severity,
        extra: Option<&Properties>,
    ) -> Result<(), S::Error> {
        if !self.sink.is_enabled(severity) {
            return Ok(());
        }
        let properties = merge_properties(&event.build_properties(), extra);
        let event_id = Self::event_id(event.name());
        let _scope = self.sink.begin_scope(severity, &properties);
        self.sink.log(severity, &event_id, event.name())
    }
}

impl<S: LogSink> Raise for Emitter<S> {
    type Error = S::Error;

    fn raise<E: Event + ?Sized>(
        &self,
        event: &E,
        severity: Severity,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error> {
        Emitter::raise(self, event, severity, extra)
    }
}
