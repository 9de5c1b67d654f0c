//! Convenient re-exports for common Herald types.
pub use crate::{
    emitter::{Emitter, Raise},
    error::EventError,
    error_event::ErrorEvent,
    event::{Event, EventData},
    exception::Exception,
    properties::{Properties, PropertyValue},
    severity::Severity,
    severity_ext::RaiseAt,
    sink::{LogSink, MemorySink, NullSink, TracingSink},
};
