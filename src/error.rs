//! Error types for event construction and configuration.

/// Errors raised synchronously when events or the service name are misused.
///
/// Sink failures are not represented here; they surface from
/// [`Emitter::raise`](crate::Emitter) as the sink's own error type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// An argument was blank or otherwise unusable.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
    /// The service name was already fixed to a different value.
    #[error("service name already set to '{current}', refusing to change it to '{requested}'")]
    ConflictingState {
        /// Value fixed by the first successful call.
        current: String,
        /// Value the rejected call tried to set.
        requested: String,
    },
}

impl EventError {
    /// Shorthand for a blank-string `InvalidArgument`.
    pub(crate) fn blank(argument: &'static str) -> Self {
        EventError::InvalidArgument {
            argument,
            reason: "must not be empty or whitespace".to_string(),
        }
    }

    /// Check if this error is an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Check if this error is a conflicting service name.
    pub fn is_conflicting_state(&self) -> bool {
        matches!(self, Self::ConflictingState { .. })
    }

    /// Name of the offending argument, if this is an `InvalidArgument`.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { argument, .. } => Some(*argument),
            _ => None,
        }
    }
}

/// Reject empty and whitespace-only strings.
pub(crate) fn require_non_blank(argument: &'static str, value: &str) -> Result<(), EventError> {
    if value.trim().is_empty() {
        return Err(EventError::blank(argument));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display_names_argument() {
        let err = EventError::blank("description");
        let msg = err.to_string();
        assert!(msg.contains("description"));
        assert!(msg.contains("whitespace"));
    }

    #[test]
    fn conflicting_state_display_includes_both_values() {
        let err = EventError::ConflictingState {
            current: "Billing".into(),
            requested: "Payments".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Billing"));
        assert!(msg.contains("Payments"));
    }

    #[test]
    fn predicates_cover_all_variants() {
        let invalid = EventError::blank("name");
        assert!(invalid.is_invalid_argument());
        assert!(!invalid.is_conflicting_state());
        assert_eq!(invalid.argument(), Some("name"));

        let conflict =
            EventError::ConflictingState { current: "a".into(), requested: "b".into() };
        assert!(conflict.is_conflicting_state());
        assert!(!conflict.is_invalid_argument());
        assert!(conflict.argument().is_none());
    }

    #[test]
    fn require_non_blank_rejects_whitespace() {
        assert!(require_non_blank("x", "").is_err());
        assert!(require_non_blank("x", "  \t\n").is_err());
        assert!(require_non_blank("x", " ok ").is_ok());
    }
}
