use std::fmt;

use crate::{Level, LogValues, LoggedError, ScopeState};

/// Renders a log state (and optional error) into the final message text.
pub type Formatter<'a> = &'a dyn Fn(&LogValues, Option<&dyn LoggedError>) -> String;

/// A structured logger, as seen by the code under test.
///
/// Code that logs through `&dyn Logger` (or `impl Logger`) can be handed the
/// recorder of a [`LoggerMock`](crate::LoggerMock) in tests and a real
/// implementation in production.
pub trait Logger {
    /// Write a log entry.
    fn log(
        &self,
        level: Level,
        state: &LogValues,
        error: Option<&dyn LoggedError>,
        formatter: Formatter<'_>,
    );

    /// Open a logical scope. The scope lasts until the returned guard is
    /// dropped.
    fn begin_scope(&self, state: &dyn ScopeState) -> ScopeGuard<'_>;

    /// Returns true if entries at `level` would be written.
    fn is_enabled(&self, level: Level) -> bool;

    /// Write an entry rendered with [`LogValues::format`].
    fn log_message(&self, level: Level, values: LogValues) {
        self.log(level, &values, None, &LogValues::formatter);
    }

    /// Write an error-level entry carrying `error`.
    fn log_error(&self, error: &dyn LoggedError, values: LogValues) {
        self.log(Level::Error, &values, Some(error), &LogValues::formatter);
    }
}

/// Closes a logger scope when dropped.
///
/// Returned by [`Logger::begin_scope`]; bind it for the lifetime of the
/// scope (`let _scope = logger.begin_scope(&state);`). Binding to `_`
/// drops it immediately and closes the scope on the spot.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct ScopeGuard<'a> {
    on_close: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> ScopeGuard<'a> {
    /// A guard that runs `on_close` exactly once, when dropped.
    pub fn new(on_close: impl FnOnce() + 'a) -> Self {
        Self {
            on_close: Some(Box::new(on_close)),
        }
    }

    /// A guard with nothing to close.
    pub fn noop() -> Self {
        Self { on_close: None }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(close) = self.on_close.take() {
            close();
        }
    }
}

impl fmt::Debug for ScopeGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("open", &self.on_close.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[test]
    fn guard_runs_close_once_on_drop() {
        let closed = Cell::new(0);
        {
            let _guard = ScopeGuard::new(|| closed.set(closed.get() + 1));
            assert_eq!(closed.get(), 0);
        }
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn noop_guard_does_nothing() {
        let guard = ScopeGuard::noop();
        assert!(format!("{guard:?}").contains("open: false"));
    }

    /// Collects rendered lines; enough to exercise the provided methods.
    #[derive(Default)]
    struct Lines(RefCell<Vec<String>>);

    impl Logger for Lines {
        fn log(
            &self,
            level: Level,
            state: &LogValues,
            error: Option<&dyn LoggedError>,
            formatter: Formatter<'_>,
        ) {
            let suffix = error.map(|e| format!(" ({e})")).unwrap_or_default();
            self.0
                .borrow_mut()
                .push(format!("{level}: {}{suffix}", formatter(state, error)));
        }

        fn begin_scope(&self, _state: &dyn ScopeState) -> ScopeGuard<'_> {
            ScopeGuard::new(|| self.0.borrow_mut().push("end".into()))
        }

        fn is_enabled(&self, _level: Level) -> bool {
            true
        }
    }

    #[test]
    fn provided_methods_render_with_default_formatter() {
        let lines = Lines::default();
        lines.log_message(Level::Debug, LogValues::new("Count {N}").arg(3));
        lines.log_error(
            &std::io::Error::other("disk full"),
            LogValues::new("Write failed"),
        );
        {
            let _scope = lines.begin_scope(&"request 123");
        }

        assert_eq!(
            *lines.0.borrow(),
            ["Debug: Count 3", "Error: Write failed (disk full)", "end"]
        );
    }
}
