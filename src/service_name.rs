//! Process-wide service name prefixed onto every event name.
//!
//! The name is write-once: the first successful [`set_service_name`] fixes it
//! for the lifetime of the process. Repeating the same value is a no-op; a
//! different value is rejected with [`EventError::ConflictingState`]. Until a
//! name is set, events are named against [`DEFAULT_SERVICE_NAME`].

use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::error::{require_non_blank, EventError};

/// Service name used while none has been set.
pub const DEFAULT_SERVICE_NAME: &str = "Service";

/// A write-once string cell with idempotent, conflict-detecting sets.
///
/// Concurrent first-time sets race through [`OnceLock`]: exactly one value is
/// stored and every caller is then validated against it.
#[derive(Debug, Default)]
pub struct ServiceNameCell {
    inner: OnceLock<String>,
}

impl ServiceNameCell {
    /// Create an unset cell.
    pub const fn new() -> Self {
        Self { inner: OnceLock::new() }
    }

    /// Fix the name, or confirm it already equals `name`.
    pub fn set(&self, name: &str) -> Result<(), EventError> {
        require_non_blank("service_name", name)?;
        let mut won = false;
        let current = self.inner.get_or_init(|| {
            won = true;
            name.to_string()
        });
        if current != name {
            warn!(
                target: "herald::service_name",
                current = %current,
                requested = %name,
                "rejected attempt to change service name"
            );
            return Err(EventError::ConflictingState {
                current: current.clone(),
                requested: name.to_string(),
            });
        }
        if won {
            debug!(target: "herald::service_name", service_name = %name, "service name set");
        }
        Ok(())
    }

    /// The stored name, if one has been set.
    pub fn get(&self) -> Option<&str> {
        self.inner.get().map(String::as_str)
    }

    /// The stored name, or [`DEFAULT_SERVICE_NAME`] while unset.
    pub fn get_or_default(&self) -> &str {
        self.get().unwrap_or(DEFAULT_SERVICE_NAME)
    }

    /// Whether a name has been fixed.
    pub fn is_set(&self) -> bool {
        self.inner.get().is_some()
    }
}

static SERVICE_NAME: ServiceNameCell = ServiceNameCell::new();

/// Set the process-wide service name.
///
/// # Errors
///
/// * [`EventError::InvalidArgument`] if `name` is empty or whitespace.
/// * [`EventError::ConflictingState`] if a different name was already set.
pub fn set_service_name(name: &str) -> Result<(), EventError> {
    SERVICE_NAME.set(name)
}

/// Current process-wide service name (`"Service"` until set).
pub fn service_name() -> &'static str {
    SERVICE_NAME.get_or_default()
}

/// Whether [`set_service_name`] has succeeded in this process.
pub fn is_service_name_set() -> bool {
    SERVICE_NAME.is_set()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn unset_cell_reports_default() {
        let cell = ServiceNameCell::new();
        assert!(!cell.is_set());
        assert_eq!(cell.get(), None);
        assert_eq!(cell.get_or_default(), "Service");
    }

    #[test]
    fn same_value_twice_is_idempotent() {
        let cell = ServiceNameCell::new();
        cell.set("Billing").unwrap();
        cell.set("Billing").unwrap();
        assert_eq!(cell.get(), Some("Billing"));
    }

    #[test]
    fn different_value_conflicts() {
        let cell = ServiceNameCell::new();
        cell.set("Billing").unwrap();
        let err = cell.set("Payments").unwrap_err();
        assert_eq!(
            err,
            EventError::ConflictingState { current: "Billing".into(), requested: "Payments".into() }
        );
        assert_eq!(cell.get(), Some("Billing"));
    }

    #[test]
    fn blank_names_rejected_before_and_after_set() {
        let cell = ServiceNameCell::new();
        for blank in ["", " ", "\t\n"] {
            assert!(cell.set(blank).unwrap_err().is_invalid_argument());
        }
        assert!(!cell.is_set());
        cell.set("Billing").unwrap();
        assert!(cell.set("   ").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn concurrent_first_sets_have_single_winner() {
        let cell = Arc::new(ServiceNameCell::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cell = cell.clone();
                thread::spawn(move || cell.set(&format!("svc-{i}")).map(|_| i))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        let expected = format!("svc-{}", winners[0]);
        assert_eq!(cell.get(), Some(expected.as_str()));
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(err.is_conflicting_state());
        }
    }

    #[test]
    fn concurrent_same_value_sets_all_succeed() {
        let cell = Arc::new(ServiceNameCell::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = cell.clone();
                thread::spawn(move || cell.set("Billing"))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }
        assert_eq!(cell.get(), Some("Billing"));
    }
}
