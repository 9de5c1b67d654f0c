//! Events describing a failure, with the error chain flattened into properties.

use crate::error::{require_non_blank, EventError};
use crate::event::{Event, EventData};
use crate::exception::Exception;
use crate::properties::{Properties, PropertyValue};
use crate::service_name::service_name;

/// Property key for the caller-supplied error message.
pub const ERROR_MESSAGE_KEY: &str = "Error message";
/// Property key for the outermost exception's type.
pub const EXCEPTION_TYPE_KEY: &str = "Exception type";
/// Property key for the outermost exception's message.
pub const EXCEPTION_MESSAGE_KEY: &str = "Exception message";
/// Property key for the outermost exception's stack.
pub const STACK_KEY: &str = "Stack";
/// Property key for the root exception's type.
pub const BASE_EXCEPTION_TYPE_KEY: &str = "Base.Exception type";
/// Property key for the root exception's message.
pub const BASE_EXCEPTION_MESSAGE_KEY: &str = "Base.Exception message";
/// Property key for the root exception's stack.
pub const BASE_STACK_KEY: &str = "Base.Stack";

/// An event recording an error message and, optionally, the error behind it.
///
/// Only the outermost exception and its root cause are recorded;
/// intermediate causes are skipped. Properties are final once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    data: EventData,
}

impl ErrorEvent {
    /// An error event with no exception and no extra properties.
    pub fn new(description: &str, error_message: &str) -> Result<Self, EventError> {
        Self::builder(description, error_message).build()
    }

    /// Start building an error event.
    pub fn builder(
        description: impl Into<String>,
        error_message: impl Into<String>,
    ) -> ErrorEventBuilder {
        ErrorEventBuilder {
            service: None,
            description: description.into(),
            error_message: error_message.into(),
            exception: None,
            extra: None,
        }
    }

    /// The caller-supplied error message.
    pub fn error_message(&self) -> &str {
        self.data.property(ERROR_MESSAGE_KEY).and_then(PropertyValue::as_str).unwrap_or_default()
    }
}

impl Event for ErrorEvent {
    fn data(&self) -> &EventData {
        &self.data
    }
}

/// Builder for [`ErrorEvent`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ErrorEventBuilder {
    service: Option<String>,
    description: String,
    error_message: String,
    exception: Option<Exception>,
    extra: Option<Properties>,
}

impl ErrorEventBuilder {
    /// Attach the error behind this event.
    pub fn exception(mut self, exception: impl Into<Exception>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Attach the error behind this event, if there is one.
    pub fn maybe_exception(mut self, exception: Option<Exception>) -> Self {
        self.exception = exception;
        self
    }

    /// Add one extra property; applied last, overriding derived keys.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.extra.get_or_insert_with(Properties::new).insert(key.into(), value.into());
        self
    }

    /// Add extra properties; applied last, overriding derived keys.
    pub fn properties(mut self, extra: &Properties) -> Self {
        let target = self.extra.get_or_insert_with(Properties::new);
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
        self
    }

    #[cfg(test)]
    fn service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    /// Validate arguments and produce the event.
    ///
    /// # Errors
    ///
    /// [`EventError::InvalidArgument`] if the description or error message is blank.
    pub fn build(self) -> Result<ErrorEvent, EventError> {
        require_non_blank("error_message", &self.error_message)?;
        let service = match self.service.as_deref() {
            Some(service) => service,
            None => service_name(),
        };
        let mut data = EventData::with_service_name(service, &self.description)?;
        data.set_property(ERROR_MESSAGE_KEY, self.error_message);

        if let Some(exception) = &self.exception {
            record(&mut data, exception, EXCEPTION_TYPE_KEY, EXCEPTION_MESSAGE_KEY, STACK_KEY);
            record(
                &mut data,
                exception.root(),
                BASE_EXCEPTION_TYPE_KEY,
                BASE_EXCEPTION_MESSAGE_KEY,
                BASE_STACK_KEY,
            );
        }

        if let Some(extra) = &self.extra {
            data.extend_properties(extra);
        }
        Ok(ErrorEvent { data })
    }
}

fn record(
    data: &mut EventData,
    exception: &Exception,
    type_key: &str,
    message_key: &str,
    stack_key: &str,
) {
    data.set_property(type_key, exception.type_name());
    data.set_property(message_key, exception.message());
    if let Some(stack) = exception.stack() {
        data.set_property(stack_key, stack);
    }
}
