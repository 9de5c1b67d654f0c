//! Startup configuration.

use crate::error::EventError;
use crate::service_name::set_service_name;

/// Environment variable read by [`EventsConfig::from_env`].
pub const SERVICE_NAME_ENV: &str = "HERALD_SERVICE_NAME";

/// Settings applied once at process start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventsConfig {
    /// Process-wide service name; left at the default when `None`.
    pub service_name: Option<String>,
}

impl EventsConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from the environment. An unset or empty
    /// `HERALD_SERVICE_NAME` leaves the service name unconfigured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let service_name = lookup(SERVICE_NAME_ENV).filter(|v| !v.is_empty());
        Self { service_name }
    }

    /// Set the service name.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Apply the configuration to process-wide state.
    ///
    /// # Errors
    ///
    /// Propagates [`set_service_name`] failures.
    pub fn apply(&self) -> Result<(), EventError> {
        match &self.service_name {
            Some(name) => set_service_name(name),
            None => Ok(()),
        }
    }
}
