//! One `raise_*` shorthand per severity.

use crate::emitter::Raise;
use crate::event::Event;
use crate::properties::Properties;
use crate::severity::Severity;

/// Per-severity shorthands for [`Raise::raise`], available on every [`Raise`].
pub trait RaiseAt: Raise {
    /// Raise at [`Severity::Trace`].
    fn raise_trace<E: Event + ?Sized>(
        &self,
        event: &E,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error> {
        self.raise(event, Severity::Trace, extra)
    }

    /// Raise at [`Severity::Debug`].
    fn raise_debug<E: Event + ?Sized>(
        &self,
        event: &E,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error> {
        self.raise(event, Severity::Debug, extra)
    }

    /// Raise at [`Severity::Information`].
    fn raise_information<E: Event + ?Sized>(
        &self,
        event: &E,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error> {
        self.raise(event, Severity::Information, extra)
    }

    /// Raise at [`Severity::Warning`].
    fn raise_warning<E: Event + ?Sized>(
        &self,
        event: &E,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error> {
        self.raise(event, Severity::Warning, extra)
    }

    /// Raise at [`Severity::Error`].
    fn raise_error<E: Event + ?Sized>(
        &self,
        event: &E,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error> {
        self.raise(event, Severity::Error, extra)
    }

    /// Raise at [`Severity::Critical`].
    fn raise_critical<E: Event + ?Sized>(
        &self,
        event: &E,
        extra: Option<&Properties>,
    ) -> Result<(), Self::Error> {
        self.raise(event, Severity::Critical, extra)
    }
}

impl<R: Raise> RaiseAt for R {}
