use std::rc::Rc;

use crate::{
    Error, Result,
    expectation::{Expectation, MessageExpectation},
};

/// Position of a node in an [`ExpectationQueue`], returned by
/// [`enqueue`](ExpectationQueue::enqueue) for fluent continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Handle(usize);

/// The declared expectations, in order, plus a read cursor.
///
/// Nodes are appended during setup and consumed one by one during replay.
/// The cursor only moves forward, and only when the caller reports a
/// successful match through [`advance`](Self::advance): looking at the head
/// with [`next`](Self::next) has no side effect.
///
/// [`next`](Self::next) hands out a shared node so the caller can run
/// matchers (and the formatters and delegates they call) after releasing
/// any borrow of the queue.
#[derive(Debug, Default)]
pub(crate) struct ExpectationQueue {
    nodes: Vec<Rc<Expectation>>,
    consumed: usize,
}

impl ExpectationQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enqueue(&mut self, node: Expectation) -> Handle {
        self.nodes.push(Rc::new(node));
        Handle(self.nodes.len() - 1)
    }

    /// The message node behind `handle`, if it is one. Only available while
    /// no replay holds on to the node.
    pub(crate) fn message_mut(&mut self, handle: Handle) -> Option<&mut MessageExpectation> {
        match self.nodes.get_mut(handle.0).and_then(Rc::get_mut) {
            Some(Expectation::Message(message)) => Some(message),
            _ => None,
        }
    }

    /// The node at the cursor.
    pub(crate) fn next(&self) -> Result<Rc<Expectation>> {
        self.nodes
            .get(self.consumed)
            .cloned()
            .ok_or(Error::TooManyCalls {
                expected: self.nodes.len(),
            })
    }

    /// Move the cursor past the node returned by [`next`](Self::next).
    pub(crate) fn advance(&mut self) {
        debug_assert!(self.consumed < self.nodes.len());
        self.consumed = (self.consumed + 1).min(self.nodes.len());
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    pub(crate) fn is_fully_consumed(&self) -> bool {
        self.consumed == self.nodes.len()
    }

    /// Labels of the nodes not consumed yet, in declaration order.
    pub(crate) fn unconsumed_labels(&self) -> Vec<String> {
        self.nodes[self.consumed..]
            .iter()
            .map(|node| node.label().into_owned())
            .collect()
    }

    /// Fails with [`Error::IncompleteSequence`] unless every node was
    /// consumed.
    pub(crate) fn verify(&self) -> Result {
        if self.is_fully_consumed() {
            return Ok(());
        }
        Err(Error::IncompleteSequence {
            expected: self.len(),
            actual: self.consumed,
            missing: self.unconsumed_labels(),
        })
    }
}
