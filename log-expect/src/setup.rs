//! Fluent declaration of the expected logger calls.
//!
//! Every call appends one expectation and returns a stage that only offers
//! what may legally follow: error and argument assertions are reachable
//! right after a message, and error assertions only after an error-level
//! message.

use std::{any::Any, cell::RefCell, fmt};

use serde_json::{Map, Value};

use crate::{
    Level, LoggedError, ScopeState, TemplateArguments,
    expectation::Expectation,
    matcher::{ArgumentsMatcher, ErrorMatcher, ScopeMatcher},
    sequence::{ExpectationQueue, Handle},
};

mod sealed {
    pub trait Sealed<'m> {
        fn sequence(&self) -> super::Sequence<'m>;
    }
}

/// Calls available at every stage of a setup chain.
///
/// Implemented by [`Sequence`], [`MessageSetup`] and [`ErrorSetup`]; bring
/// it into scope to chain declarations:
///
/// ```rust
/// use log_expect::{LoggerMock, Setup};
/// use serde_json::json;
///
/// let mock = LoggerMock::new();
/// mock.setup_sequence()
///     .log_trace("Starting")
///     .begin_scope(json!({ "RequestId": 123 }))
///         .log_information("Handling request")
///     .end_scope()
///     .log_error("Request failed");
/// ```
pub trait Setup<'m>: sealed::Sealed<'m> + Sized {
    /// Expect a message at `level` whose rendered text is `message`.
    fn log(self, level: Level, message: impl Into<String>) -> MessageSetup<'m> {
        let sequence = self.sequence();
        let handle = sequence.push(Expectation::message(level, message));
        MessageSetup { sequence, handle }
    }

    fn log_trace(self, message: impl Into<String>) -> MessageSetup<'m> {
        self.log(Level::Trace, message)
    }

    fn log_debug(self, message: impl Into<String>) -> MessageSetup<'m> {
        self.log(Level::Debug, message)
    }

    fn log_information(self, message: impl Into<String>) -> MessageSetup<'m> {
        self.log(Level::Information, message)
    }

    fn log_warning(self, message: impl Into<String>) -> MessageSetup<'m> {
        self.log(Level::Warning, message)
    }

    /// Expect an error-level message; the returned stage can also assert
    /// the attached error.
    fn log_error(self, message: impl Into<String>) -> ErrorSetup<'m> {
        let MessageSetup { sequence, handle } = self.log(Level::Error, message);
        ErrorSetup { sequence, handle }
    }

    fn log_critical(self, message: impl Into<String>) -> MessageSetup<'m> {
        self.log(Level::Critical, message)
    }

    /// Expect a scope whose state is structurally equivalent to `expected`:
    /// both are projected to a mapping of member name to value and compared
    /// key by key.
    ///
    /// If `expected` cannot be serialized, the matching `begin_scope()` call
    /// fails with [`Error::StateNotSerializable`](crate::Error::StateNotSerializable).
    fn begin_scope(self, expected: impl ScopeState) -> Sequence<'m> {
        let sequence = self.sequence();
        sequence.push(Expectation::BeginScope(ScopeMatcher::structural(&expected)));
        sequence
    }

    /// Expect a scope whose state is a mapping with exactly these entries.
    fn begin_scope_as_mapping<K, V>(self, expected: impl IntoIterator<Item = (K, V)>) -> Sequence<'m>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mapping: Map<String, Value> = expected
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let sequence = self.sequence();
        sequence.push(Expectation::BeginScope(ScopeMatcher::Mapping(mapping)));
        sequence
    }

    /// Expect a scope whose state is a `T`, then run `check` on it.
    fn begin_scope_with<T: Any>(self, check: impl Fn(&T) + 'static) -> Sequence<'m> {
        let sequence = self.sequence();
        sequence.push(Expectation::BeginScope(ScopeMatcher::typed(check)));
        sequence
    }

    /// Expect the most recently opened scope to be closed.
    fn end_scope(self) -> Sequence<'m> {
        let sequence = self.sequence();
        sequence.push(Expectation::EndScope);
        sequence
    }
}

/// Entry stage of a setup chain, returned by
/// [`LoggerMock::setup_sequence`](crate::LoggerMock::setup_sequence).
#[derive(Clone, Copy)]
pub struct Sequence<'m> {
    queue: &'m RefCell<ExpectationQueue>,
}

impl<'m> Sequence<'m> {
    pub(crate) fn new(queue: &'m RefCell<ExpectationQueue>) -> Self {
        Self { queue }
    }

    fn push(&self, node: Expectation) -> Handle {
        self.queue.borrow_mut().enqueue(node)
    }

    fn set_arguments(&self, handle: Handle, arguments: ArgumentsMatcher) {
        if let Some(message) = self.queue.borrow_mut().message_mut(handle) {
            message.set_arguments(arguments);
        }
    }

    fn set_error(&self, handle: Handle, error: ErrorMatcher) {
        if let Some(message) = self.queue.borrow_mut().message_mut(handle) {
            message.set_error(error);
        }
    }
}

impl<'m> sealed::Sealed<'m> for Sequence<'m> {
    fn sequence(&self) -> Sequence<'m> {
        *self
    }
}

impl<'m> Setup<'m> for Sequence<'m> {}

impl fmt::Debug for Sequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("declared", &self.queue.borrow().len())
            .finish()
    }
}

/// Stage right after a message expectation.
#[derive(Debug, Clone, Copy)]
pub struct MessageSetup<'m> {
    sequence: Sequence<'m>,
    handle: Handle,
}

impl<'m> MessageSetup<'m> {
    /// Assert the template arguments instead of the rendered text: the call
    /// must carry exactly `count` arguments, then `check` runs over them.
    ///
    /// ```rust
    /// # use log_expect::{LoggerMock, Setup};
    /// # use serde_json::json;
    /// let mock = LoggerMock::new();
    /// mock.setup_sequence()
    ///     .log_information("Order {Id} shipped to {City}")
    ///     .with_arguments(2, |args| {
    ///         assert_eq!(args["Id"], json!(1234));
    ///         assert_eq!(args[1], json!("Lyon"));
    ///     });
    /// ```
    pub fn with_arguments(
        self,
        count: usize,
        check: impl Fn(&TemplateArguments) + 'static,
    ) -> Sequence<'m> {
        self.sequence
            .set_arguments(self.handle, ArgumentsMatcher::predicate(count, check));
        self.sequence
    }

    /// Assert the template arguments are exactly `values`, in order.
    pub fn with_argument_values<V: Into<Value>>(
        self,
        values: impl IntoIterator<Item = V>,
    ) -> Sequence<'m> {
        let values = values.into_iter().map(Into::into).collect();
        self.sequence
            .set_arguments(self.handle, ArgumentsMatcher::Values(values));
        self.sequence
    }
}

impl<'m> sealed::Sealed<'m> for MessageSetup<'m> {
    fn sequence(&self) -> Sequence<'m> {
        self.sequence
    }
}

impl<'m> Setup<'m> for MessageSetup<'m> {}

/// Stage right after an error-level message expectation.
#[derive(Debug, Clone, Copy)]
pub struct ErrorSetup<'m> {
    sequence: Sequence<'m>,
    handle: Handle,
}

impl<'m> ErrorSetup<'m> {
    /// Expect the call to carry an error of the same type and message as
    /// `expected`. It does not need to be the same instance.
    pub fn with_error<E: LoggedError>(self, expected: &E) -> MessageSetup<'m> {
        self.sequence
            .set_error(self.handle, ErrorMatcher::literal(expected));
        self.into_message()
    }

    /// Expect the call to carry an error, then run `check` on it.
    pub fn with_error_matching(
        self,
        check: impl Fn(&dyn LoggedError) + 'static,
    ) -> MessageSetup<'m> {
        self.sequence
            .set_error(self.handle, ErrorMatcher::delegate(check));
        self.into_message()
    }

    /// See [`MessageSetup::with_arguments`]. The error can still be asserted
    /// afterwards.
    pub fn with_arguments(
        self,
        count: usize,
        check: impl Fn(&TemplateArguments) + 'static,
    ) -> ErrorSetup<'m> {
        self.sequence
            .set_arguments(self.handle, ArgumentsMatcher::predicate(count, check));
        self
    }

    /// See [`MessageSetup::with_argument_values`]. The error can still be
    /// asserted afterwards.
    pub fn with_argument_values<V: Into<Value>>(
        self,
        values: impl IntoIterator<Item = V>,
    ) -> ErrorSetup<'m> {
        let values = values.into_iter().map(Into::into).collect();
        self.sequence
            .set_arguments(self.handle, ArgumentsMatcher::Values(values));
        self
    }

    fn into_message(self) -> MessageSetup<'m> {
        MessageSetup {
            sequence: self.sequence,
            handle: self.handle,
        }
    }
}

impl<'m> sealed::Sealed<'m> for ErrorSetup<'m> {
    fn sequence(&self) -> Sequence<'m> {
        self.sequence
    }
}

impl<'m> Setup<'m> for ErrorSetup<'m> {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::matcher::MessageMatcher;

    fn labels(queue: &RefCell<ExpectationQueue>) -> Vec<String> {
        queue.borrow().unconsumed_labels()
    }

    #[test]
    fn each_call_appends_one_node_in_order() {
        let queue = RefCell::new(ExpectationQueue::new());
        Sequence::new(&queue)
            .log_trace("a")
            .begin_scope(json!({ "Level": 1 }))
            .log_debug("b")
            .end_scope()
            .log_error("c");

        assert_eq!(
            labels(&queue),
            ["Message: (a)", "BeginScope", "Message: (b)", "EndScope", "Message: (c)"]
        );
    }

    #[test]
    fn level_helpers_declare_their_level() {
        let queue = RefCell::new(ExpectationQueue::new());
        Sequence::new(&queue)
            .log_trace("t")
            .log_debug("d")
            .log_information("i")
            .log_warning("w")
            .log_error("e")
            .log_critical("c");

        let mut queue = queue.borrow_mut();
        let levels: Vec<Level> = (0..6)
            .map(|i| {
                let node = queue.next().map(|n| match &*n {
                    Expectation::Message(m) => m.level,
                    _ => unreachable!(),
                });
                queue.advance();
                node.unwrap_or_else(|_| panic!("node {i} missing"))
            })
            .collect();
        assert_eq!(levels, Level::ALL);
    }

    #[test]
    fn arguments_attach_to_the_preceding_message() {
        let queue = RefCell::new(ExpectationQueue::new());
        Sequence::new(&queue)
            .log_information("Order {Id}")
            .with_argument_values([1234])
            .log_debug("after");

        let queue = queue.borrow();
        let node = queue.next().unwrap();
        let Expectation::Message(message) = &*node else {
            unreachable!()
        };
        assert!(matches!(
            &message.matcher,
            MessageMatcher::Arguments(ArgumentsMatcher::Values(v)) if v == &[json!(1234)]
        ));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn error_setup_accepts_arguments_then_error() {
        let queue = RefCell::new(ExpectationQueue::new());
        let err = std::io::Error::other("disk full");
        Sequence::new(&queue)
            .log_error("Write {Path} failed")
            .with_arguments(1, |_| {})
            .with_error(&err)
            .log_trace("next");

        let queue = queue.borrow();
        let node = queue.next().unwrap();
        let Expectation::Message(message) = &*node else {
            unreachable!()
        };
        assert!(matches!(message.matcher, MessageMatcher::Arguments(_)));
        assert!(matches!(
            &message.error,
            Some(ErrorMatcher::Literal { message, .. }) if message == "disk full"
        ));
    }

    #[test]
    fn mapping_scope_collects_entries() {
        let queue = RefCell::new(ExpectationQueue::new());
        Sequence::new(&queue).begin_scope_as_mapping([("ScopeLevel", 1), ("Depth", 2)]);

        let queue = queue.borrow();
        let node = queue.next().unwrap();
        let Expectation::BeginScope(ScopeMatcher::Mapping(map)) = &*node else {
            unreachable!()
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map["ScopeLevel"], json!(1));
    }
}
