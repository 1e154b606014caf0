use std::fmt;

/// Severity of a log call.
///
/// Mirrors the level set of a typical structured logger: five everyday
/// levels plus [`Critical`](Self::Critical) for failures that take the
/// process down. Levels are compared for exact equality when an expectation
/// is matched; there is no "at least" semantics.
///
/// The [`Display`](fmt::Display) form is the variant name and appears
/// verbatim in failure messages:
///
/// ```rust
/// use log_expect::Level;
///
/// assert_eq!(Level::Information.to_string(), "Information");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Information,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// All levels, from least to most severe.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Information,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Returns the variant name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "Trace",
            Level::Debug => "Debug",
            Level::Information => "Information",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Critical => "Critical",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// `tracing` has no critical level; its ERROR maps onto ours.
impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::TRACE {
            Level::Trace
        } else if level == tracing::Level::DEBUG {
            Level::Debug
        } else if level == tracing::Level::INFO {
            Level::Information
        } else if level == tracing::Level::WARN {
            Level::Warning
        } else {
            Level::Error
        }
    }
}
