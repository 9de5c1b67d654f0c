//! Ordered log severities.

use std::fmt;
use std::str::FromStr;

/// Importance of an emitted event, ordered `Trace < ... < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Very detailed diagnostics.
    Trace,
    /// Debugging diagnostics.
    Debug,
    /// Normal operational events.
    Information,
    /// Unexpected but handled conditions.
    Warning,
    /// Failures of the current operation.
    Error,
    /// Failures requiring immediate attention.
    Critical,
}

impl Severity {
    /// Every severity, lowest first.
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Information,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Closest `tracing` level. `tracing` has no level above `ERROR`, so
    /// `Critical` shares it.
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Severity::Trace => tracing::Level::TRACE,
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Information => tracing::Level::INFO,
            Severity::Warning => tracing::Level::WARN,
            Severity::Error | Severity::Critical => tracing::Level::ERROR,
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "Trace",
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown severity name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity '{0}'")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "information" | "info" => Ok(Severity::Information),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" | "fatal" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::TRACE {
            Severity::Trace
        } else if level == tracing::Level::DEBUG {
            Severity::Debug
        } else if level == tracing::Level::INFO {
            Severity::Information
        } else if level == tracing::Level::WARN {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Critical));
    }

    #[test]
    fn parse_accepts_names_and_aliases() {
        for s in Severity::ALL {
            assert_eq!(s.as_str().parse::<Severity>().unwrap(), s);
        }
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Information);
        assert_eq!(" warn ".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("fatal".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("loud".parse::<Severity>().unwrap_err().to_string().contains("loud"));
    }

    #[test]
    fn critical_maps_to_tracing_error() {
        assert_eq!(Severity::Critical.as_tracing_level(), tracing::Level::ERROR);
        assert_eq!(Severity::from(tracing::Level::INFO), Severity::Information);
    }
}
