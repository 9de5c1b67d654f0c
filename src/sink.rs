//! The logging backend boundary and the sinks shipped with the crate.
//!
//! A [`LogSink`] answers whether a severity is active, opens a structured
//! scope around a single call, and writes one record per call. Properties
//! always travel in the scope; the message is the event name only.
//!
//! - [`NullSink`] is never active, so nothing is built or written.
//! - [`TracingSink`] forwards onto the `tracing` facade.
//! - [`MemorySink`] keeps records in memory for inspection.

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use tracing::Level;

use crate::properties::{DisplayProperties, Properties};
use crate::severity::Severity;

/// Stable numeric identifier paired with the event name it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId {
    /// Hash of `name`.
    pub id: u32,
    /// Full event name.
    pub name: String,
}

impl EventId {
    /// Derive the identifier for `name` (32-bit FNV-1a over its UTF-8 bytes).
    pub fn from_name(name: &str) -> Self {
        Self { id: fnv1a_32(name.as_bytes()), name: name.to_string() }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| (hash ^ u32::from(*b)).wrapping_mul(FNV_PRIME))
}

/// A logging backend that events are delivered to.
pub trait LogSink {
    /// Error produced by [`log`](Self::log); returned to callers unchanged.
    type Error: std::error::Error + Send + Sync + 'static;
    /// Guard for an open scope; dropping it closes the scope.
    type Scope;

    /// Whether records at `severity` would be written. Must be cheap and pure.
    fn is_enabled(&self, severity: Severity) -> bool;

    /// Open a structured scope carrying `properties` for a record at `severity`.
    fn begin_scope(&self, severity: Severity, properties: &Properties) -> Self::Scope;

    /// Write one record inside the current scope.
    fn log(&self, severity: Severity, event_id: &EventId, message: &str)
        -> Result<(), Self::Error>;
}

impl<S: LogSink + ?Sized> LogSink for &S {
    type Error = S::Error;
    type Scope = S::Scope;

    fn is_enabled(&self, severity: Severity) -> bool {
        (**self).is_enabled(severity)
    }

    fn begin_scope(&self, severity: Severity, properties: &Properties) -> Self::Scope {
        (**self).begin_scope(severity, properties)
    }

    fn log(
        &self,
        severity: Severity,
        event_id: &EventId,
        message: &str,
    ) -> Result<(), Self::Error> {
        (**self).log(severity, event_id, message)
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    type Error = S::Error;
    type Scope = S::Scope;

    fn is_enabled(&self, severity: Severity) -> bool {
        (**self).is_enabled(severity)
    }

    fn begin_scope(&self, severity: Severity, properties: &Properties) -> Self::Scope {
        (**self).begin_scope(severity, properties)
    }

    fn log(
        &self,
        severity: Severity,
        event_id: &EventId,
        message: &str,
    ) -> Result<(), Self::Error> {
        (**self).log(severity, event_id, message)
    }
}

/// A sink that is never active and discards everything.
#[derive(Clone, Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    type Error = Infallible;
    type Scope = ();

    fn is_enabled(&self, _severity: Severity) -> bool {
        false
    }

    fn begin_scope(&self, _severity: Severity, _properties: &Properties) -> Self::Scope {}

    fn log(&self, _: Severity, _: &EventId, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Target used for everything [`TracingSink`] emits.
pub const TRACING_TARGET: &str = "herald::event";

// tracing macros need a constant level; bind one per arm.
macro_rules! at_level {
    ($severity:expr, $lvl:ident => $body:expr) => {
        match $severity {
            Severity::Trace => {
                const $lvl: Level = Level::TRACE;
                $body
            }
            Severity::Debug => {
                const $lvl: Level = Level::DEBUG;
                $body
            }
            Severity::Information => {
                const $lvl: Level = Level::INFO;
                $body
            }
            Severity::Warning => {
                const $lvl: Level = Level::WARN;
                $body
            }
            Severity::Error | Severity::Critical => {
                const $lvl: Level = Level::ERROR;
                $body
            }
        }
    };
}

/// A sink that writes events through the `tracing` facade.
///
/// The scope is an entered `event_scope` span, at the record's level, with a
/// `properties` field. `tracing` span fields are fixed at the callsite, so the
/// property map arrives as one rendered string (`Key="text", Key=3`), not
/// as individual fields; subscribers that need typed values should use
/// [`MemorySink`] or a custom [`LogSink`].
///
/// Each record is a single `tracing` event carrying `event_id`, `event_name`
/// and `severity` fields. `Critical` is written at `ERROR` with
/// `severity = "Critical"`.
#[derive(Clone, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    type Error = Infallible;
    type Scope = tracing::span::EnteredSpan;

    fn is_enabled(&self, severity: Severity) -> bool {
        at_level!(severity, LEVEL => tracing::enabled!(target: TRACING_TARGET, LEVEL))
    }

    fn begin_scope(&self, severity: Severity, properties: &Properties) -> Self::Scope {
        let rendered = DisplayProperties(properties);
        let span = at_level!(severity, LEVEL => {
            tracing::span!(target: TRACING_TARGET, LEVEL, "event_scope", properties = %rendered)
        });
        span.entered()
    }

    fn log(
        &self,
        severity: Severity,
        event_id: &EventId,
        message: &str,
    ) -> Result<(), Self::Error> {
        at_level!(severity, LEVEL => tracing::event!(
            target: TRACING_TARGET,
            LEVEL,
            event_id = event_id.id,
            event_name = %event_id.name,
            severity = %severity,
            "{}",
            message
        ));
        Ok(())
    }
}

/// A record captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Severity the record was written at.
    pub severity: Severity,
    /// Identifier passed to the sink.
    pub event_id: EventId,
    /// Message text.
    pub message: String,
    /// Properties of every scope open on the writing thread, outermost first.
    pub properties: Properties,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: VecDeque<LogRecord>,
    scopes: HashMap<ThreadId, Vec<(u64, Properties)>>,
    scopes_opened: u64,
    evicted: u64,
}

/// A sink that stores records in memory, evicting the oldest when full.
///
/// Clones share storage, so a clone handed to an emitter can be inspected
/// through the original. Scopes are tracked per thread.
#[derive(Clone, Debug)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
    minimum: Severity,
    capacity: usize,
}

impl MemorySink {
    /// Record everything, keeping up to 10 000 records.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Record everything, keeping up to `capacity` records (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            minimum: Severity::Trace,
            capacity: capacity.max(1),
        }
    }

    /// Only report severities at or above `minimum` as enabled.
    pub fn with_minimum_severity(mut self, minimum: Severity) -> Self {
        self.minimum = minimum;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of stored records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().records.iter().cloned().collect()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Drop all stored records.
    pub fn clear(&self) {
        self.lock().records.clear();
    }

    /// Maximum number of stored records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lowest severity reported as enabled.
    pub fn minimum_severity(&self) -> Severity {
        self.minimum
    }

    /// Records dropped to stay within capacity.
    pub fn evicted(&self) -> u64 {
        self.lock().evicted
    }

    /// Scopes currently open, across all threads.
    pub fn open_scopes(&self) -> usize {
        self.lock().scopes.values().map(Vec::len).sum()
    }

    /// Scopes opened since creation.
    pub fn scopes_opened(&self) -> u64 {
        self.lock().scopes_opened
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

/// Open scope on a [`MemorySink`]; closes on drop.
#[derive(Debug)]
pub struct MemoryScope {
    state: Arc<Mutex<MemoryState>>,
    thread: ThreadId,
    token: u64,
}

impl Drop for MemoryScope {
    fn drop(&mut self) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(stack) = guard.scopes.get_mut(&self.thread) {
            // Guards may be dropped out of order; remove this guard's entry only.
            if let Some(index) = stack.iter().rposition(|(token, _)| *token == self.token) {
                stack.remove(index);
            }
            if stack.is_empty() {
                guard.scopes.remove(&self.thread);
            }
        }
    }
}

impl LogSink for MemorySink {
    type Error = Infallible;
    type Scope = MemoryScope;

    fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.minimum
    }

    fn begin_scope(&self, _severity: Severity, properties: &Properties) -> Self::Scope {
        let thread = thread::current().id();
        let mut guard = self.lock();
        let token = guard.scopes_opened;
        guard.scopes_opened += 1;
        guard.scopes.entry(thread).or_default().push((token, properties.clone()));
        MemoryScope { state: self.state.clone(), thread, token }
    }

    fn log(
        &self,
        severity: Severity,
        event_id: &EventId,
        message: &str,
    ) -> Result<(), Self::Error> {
        let mut guard = self.lock();
        let mut properties = Properties::new();
        if let Some(stack) = guard.scopes.get(&thread::current().id()) {
            for (_, scope) in stack {
                properties.extend(scope.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        if guard.records.len() >= self.capacity {
            guard.records.pop_front();
            guard.evicted += 1;
        }
        guard.records.push_back(LogRecord {
            severity,
            event_id: event_id.clone(),
            message: message.to_string(),
            properties,
        });
        Ok(())
    }
}
