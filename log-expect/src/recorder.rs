use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    Config, Error, Level, LogValues, LoggedError, Logger, Result, ScopeGuard, ScopeState,
    expectation::Expectation, logger::Formatter, sequence::ExpectationQueue,
};

/// The [`Logger`] handed to the code under test.
///
/// Obtained from [`LoggerMock::logger`](crate::LoggerMock::logger). Every
/// call is matched against the next declared expectation; the first call
/// that does not match panics with the reason. The `try_*` methods perform
/// the same checks and return the failure instead.
///
/// Clones share the same expectations, so a recorder can be handed to
/// several collaborators of the code under test.
#[derive(Clone)]
pub struct Recorder {
    queue: Rc<RefCell<ExpectationQueue>>,
    config: Rc<Config>,
}

impl Recorder {
    pub(crate) fn new(queue: Rc<RefCell<ExpectationQueue>>, config: Rc<Config>) -> Self {
        Self { queue, config }
    }

    /// Category of the mocked logger, if one was configured.
    pub fn category(&self) -> Option<&str> {
        self.config.category()
    }

    /// Match a `log()` call against the next expectation.
    pub fn try_log(
        &self,
        level: Level,
        state: &LogValues,
        error: Option<&dyn LoggedError>,
        formatter: Formatter<'_>,
    ) -> Result {
        self.consume("log()", |node| match node {
            Expectation::Message(expected) => {
                if expected.level != level {
                    return Err(Error::WrongLevel {
                        expected: expected.level,
                        actual: level,
                    });
                }
                expected.matcher.check(level, state, error, formatter)?;
                match &expected.error {
                    Some(matcher) => matcher.check(error),
                    None => Ok(()),
                }
            }
            other => Err(unexpected_call("log()", other)),
        })
    }

    /// Match a `begin_scope()` call against the next expectation and return
    /// the guard that closes the scope.
    pub fn try_begin_scope(&self, state: &dyn ScopeState) -> Result<ScopeGuard<'static>> {
        self.consume("begin_scope()", |node| match node {
            Expectation::BeginScope(matcher) => matcher.check(state),
            other => Err(unexpected_call("begin_scope()", other)),
        })?;

        let recorder = self.clone();
        Ok(ScopeGuard::new(move || recorder.close_scope()))
    }

    /// Match the end of a scope against the next expectation. This is what
    /// dropping a guard returned by [`begin_scope`](Logger::begin_scope)
    /// does.
    pub fn try_end_scope(&self) -> Result {
        self.consume("drop()", |node| match node {
            Expectation::EndScope => Ok(()),
            other => Err(unexpected_call("drop()", other)),
        })
    }

    fn close_scope(&self) {
        let result = self.try_end_scope();
        // The code under test is already failing; a scope mismatch on top of
        // it would hide the original panic (and abort the process).
        if std::thread::panicking() {
            if let Err(err) = result {
                tracing::warn!(
                    error = %err,
                    "scope guard dropped while panicking, end of scope does not match"
                );
            }
            return;
        }
        if let Err(err) = result {
            fail(err);
        }
    }

    /// Run `check` against the node at the cursor and advance only if it
    /// passes. The queue is not borrowed while `check` runs.
    fn consume(&self, method: &'static str, check: impl FnOnce(&Expectation) -> Result) -> Result {
        let next = self.queue.borrow().next();
        let matched = next.and_then(|node| check(&node).map(|()| node.label().into_owned()));

        match matched {
            Ok(label) => {
                let mut queue = self.queue.borrow_mut();
                let index = queue.consumed();
                queue.advance();
                tracing::trace!(method, index, %label, "expectation matched");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(method, error = %err, "logger call does not match expectations");
                Err(err)
            }
        }
    }
}

impl Logger for Recorder {
    fn log(
        &self,
        level: Level,
        state: &LogValues,
        error: Option<&dyn LoggedError>,
        formatter: Formatter<'_>,
    ) {
        if let Err(err) = self.try_log(level, state, error, formatter) {
            fail(err);
        }
    }

    fn begin_scope(&self, state: &dyn ScopeState) -> ScopeGuard<'_> {
        match self.try_begin_scope(state) {
            Ok(guard) => guard,
            Err(err) => fail(err),
        }
    }

    fn is_enabled(&self, _level: Level) -> bool {
        fail(Error::Unsupported {
            library: self.config.library_name().to_string(),
        })
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("Recorder")
            .field("category", &self.config.category())
            .field("expected", &queue.len())
            .field("consumed", &queue.consumed())
            .finish()
    }
}

fn unexpected_call(method: &'static str, node: &Expectation) -> Error {
    Error::UnexpectedCall {
        method,
        expected: node.label().into_owned(),
    }
}

/// Assertion failure: abort the calling test with the error's message.
pub(crate) fn fail(err: Error) -> ! {
    panic!("{err}")
}
