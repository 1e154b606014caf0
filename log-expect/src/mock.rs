use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    Config, Recorder, Result,
    recorder::fail,
    sequence::ExpectationQueue,
    setup::Sequence,
};

/// Strict, ordered test double for a [`Logger`](crate::Logger).
///
/// Declare the expected calls with [`setup_sequence`](Self::setup_sequence),
/// hand [`logger`](Self::logger) to the code under test, then call
/// [`verify`](Self::verify). Every call must match the next declared
/// expectation exactly, in order; the first call that does not panics on the
/// spot with the reason, and `verify` panics if anything declared was never
/// called.
///
/// # Examples
///
/// ```rust
/// use log_expect::{Logger, LoggerMock, LogValues, Setup};
/// use serde_json::json;
///
/// fn process(logger: &dyn Logger, id: u32) {
///     let _scope = logger.begin_scope(&json!({ "Id": id }));
///     logger.log_message(log_expect::Level::Information, LogValues::new("Processing {Id}").arg(id));
/// }
///
/// let mock = LoggerMock::new();
/// mock.setup_sequence()
///     .begin_scope(json!({ "Id": 7 }))
///     .log_information("Processing 7")
///     .end_scope();
///
/// process(&mock.logger(), 7);
/// mock.verify();
/// ```
pub struct LoggerMock {
    queue: Rc<RefCell<ExpectationQueue>>,
    config: Rc<Config>,
}

impl LoggerMock {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            queue: Rc::new(RefCell::new(ExpectationQueue::new())),
            config: Rc::new(config),
        }
    }

    /// Start (or continue) declaring expectations. Successive chains append
    /// to the same sequence.
    pub fn setup_sequence(&self) -> Sequence<'_> {
        Sequence::new(&self.queue)
    }

    /// The logger to hand to the code under test.
    pub fn logger(&self) -> Recorder {
        Recorder::new(self.queue.clone(), self.config.clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Panics unless every declared expectation has been consumed, listing
    /// the ones that were not.
    pub fn verify(&self) {
        if let Err(err) = self.try_verify() {
            fail(err);
        }
    }

    /// Same as [`verify`](Self::verify) but returns the failure.
    pub fn try_verify(&self) -> Result {
        let queue = self.queue.borrow();
        let result = queue.verify();
        tracing::debug!(
            expected = queue.len(),
            consumed = queue.consumed(),
            ok = result.is_ok(),
            "verify"
        );
        result
    }
}

impl Default for LoggerMock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerMock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("LoggerMock")
            .field("config", &self.config)
            .field("expected", &queue.len())
            .field("consumed", &queue.consumed())
            .finish_non_exhaustive()
    }
}
