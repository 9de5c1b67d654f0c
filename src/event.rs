//! The event abstraction: a named payload carrying a flat property map.
//!
//! Concrete event types embed an [`EventData`] and implement [`Event`] by
//! returning it from [`Event::data`]. The name and the two identity
//! properties are fixed when the data is constructed.
//!
//! ```rust
//! use herald::{Event, EventData, EventError};
//!
//! struct OrderPlaced {
//!     data: EventData,
//! }
//!
//! impl OrderPlaced {
//!     fn new(order_id: u64) -> Result<Self, EventError> {
//!         let data = EventData::new("Order placed")?.with_property("Order id", order_id);
//!         Ok(Self { data })
//!     }
//! }
//!
//! impl Event for OrderPlaced {
//!     fn data(&self) -> &EventData {
//!         &self.data
//!     }
//! }
//!
//! let event = OrderPlaced::new(42).unwrap();
//! assert!(event.name().ends_with(".Order placed"));
//! ```

use std::borrow::Cow;

use crate::error::{require_non_blank, EventError};
use crate::properties::{Properties, PropertyValue};
use crate::service_name::service_name;

/// Property key holding the service name.
pub const SERVICE_NAME_KEY: &str = "Service name";
/// Property key holding the event description.
pub const EVENT_DESCRIPTION_KEY: &str = "Event description";

/// Capability shared by every emittable event.
pub trait Event {
    /// The embedded name and property storage.
    fn data(&self) -> &EventData;

    /// `"{service name}.{description}"`, fixed at construction.
    fn name(&self) -> &str {
        self.data().name()
    }

    /// Properties to emit.
    ///
    /// The default borrows the stored map. Types with computed properties may
    /// override this and return an owned map; implementations must not have
    /// side effects.
    fn build_properties(&self) -> Cow<'_, Properties> {
        Cow::Borrowed(self.data().properties())
    }
}

impl<E: Event + ?Sized> Event for &E {
    fn data(&self) -> &EventData {
        (**self).data()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn build_properties(&self) -> Cow<'_, Properties> {
        (**self).build_properties()
    }
}

impl<E: Event + ?Sized> Event for Box<E> {
    fn data(&self) -> &EventData {
        (**self).data()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn build_properties(&self) -> Cow<'_, Properties> {
        (**self).build_properties()
    }
}

/// Name and properties of an event.
///
/// Usable directly as a plain event, or embedded in a richer event type.
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    name: String,
    properties: Properties,
}

impl EventData {
    /// Create event data named against the current process-wide service name.
    ///
    /// # Errors
    ///
    /// [`EventError::InvalidArgument`] if `description` is empty or whitespace.
    pub fn new(description: &str) -> Result<Self, EventError> {
        Self::with_service_name(service_name(), description)
    }

    /// Create event data for an explicit service name.
    pub(crate) fn with_service_name(service: &str, description: &str) -> Result<Self, EventError> {
        require_non_blank("description", description)?;
        let mut properties = Properties::new();
        properties.insert(SERVICE_NAME_KEY.to_string(), PropertyValue::from(service));
        properties.insert(EVENT_DESCRIPTION_KEY.to_string(), PropertyValue::from(description));
        Ok(Self { name: format!("{}.{}", service, description), properties })
    }

    /// Add or replace a property, consuming and returning `self`.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.set_property(key, value);
        self
    }

    /// Add or replace a property, returning the previous value.
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Add or replace every entry of `extra`, in its iteration order.
    pub fn extend_properties(&mut self, extra: &Properties) {
        for (key, value) in extra {
            self.properties.insert(key.clone(), value.clone());
        }
    }

    /// Full event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Look up a single property.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Description given at construction.
    pub fn description(&self) -> &str {
        self.property_str(EVENT_DESCRIPTION_KEY)
    }

    /// Service name captured at construction.
    pub fn service_name(&self) -> &str {
        self.property_str(SERVICE_NAME_KEY)
    }

    fn property_str(&self, key: &str) -> &str {
        self.properties.get(key).and_then(PropertyValue::as_str).unwrap_or_default()
    }
}

impl Event for EventData {
    fn data(&self) -> &EventData {
        self
    }
}
