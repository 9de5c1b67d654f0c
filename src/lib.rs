#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Herald
//!
//! Strongly-typed structured events delivered to a logging sink.
//!
//! An event has a name (`"{service name}.{description}"`) and a flat property
//! map. Raising it through an [`Emitter`] merges those properties with any
//! call-site extras, PascalCases the keys and writes a single record whose
//! message is the event name, with the properties attached as a structured
//! scope rather than interpolated into the text.
//!
//! ## Features
//!
//! - **Write-once service name** shared by every event in the process
//! - **Error events** that flatten an error and its root cause into properties
//! - **Zero work for suppressed severities**: nothing is built when the sink is inactive
//! - **Pluggable sinks**: `tracing`, in-memory, or your own [`LogSink`]
//!
//! ## Quick Start
//!
//! ```rust
//! use herald::prelude::*;
//!
//! herald::set_service_name("Billing").unwrap();
//!
//! let emitter = Emitter::new(TracingSink);
//! let event = EventData::new("Invoice sent").unwrap().with_property("invoiceId", 1042);
//! emitter.raise_information(&event, None).unwrap();
//!
//! let failure = ErrorEvent::builder("Charge failed", "card declined")
//!     .exception(Exception::new("GatewayError", "402 from processor"))
//!     .build()
//!     .unwrap();
//! emitter.raise_error(&failure, None).unwrap();
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod error_event;
pub mod event;
pub mod exception;
pub mod prelude;
pub mod properties;
pub mod service_name;
pub mod severity;
pub mod severity_ext;
pub mod sink;

// Re-exports
pub use config::EventsConfig;
pub use emitter::{Emitter, Raise};
pub use error::EventError;
pub use error_event::{ErrorEvent, ErrorEventBuilder};
pub use event::{Event, EventData};
pub use exception::{Exception, TypeNames};
pub use properties::{merge_properties, pascal_case, Properties, PropertyValue};
pub use service_name::{is_service_name_set, service_name, set_service_name};
pub use severity::Severity;
pub use severity_ext::RaiseAt;
pub use sink::{EventId, LogRecord, LogSink, MemorySink, NullSink, TracingSink};
