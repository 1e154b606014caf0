use std::borrow::Cow;

use crate::{
    Level,
    matcher::{ArgumentsMatcher, ErrorMatcher, MessageMatcher, ScopeMatcher},
};

/// One declared, ordered unit of expected logger interaction.
#[derive(Debug)]
pub(crate) enum Expectation {
    Message(MessageExpectation),
    BeginScope(ScopeMatcher),
    EndScope,
}

impl Expectation {
    pub(crate) fn message(level: Level, text: impl Into<String>) -> Self {
        Expectation::Message(MessageExpectation::new(level, text.into()))
    }

    /// Kind name, as used in failure messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Expectation::Message(_) => "Message",
            Expectation::BeginScope(_) => "BeginScope",
            Expectation::EndScope => "EndScope",
        }
    }

    /// Human-readable description used in failure reports.
    pub(crate) fn label(&self) -> Cow<'static, str> {
        match self {
            Expectation::Message(message) => {
                Cow::Owned(format!("{}: ({})", self.kind(), message.text))
            }
            Expectation::BeginScope(_) | Expectation::EndScope => Cow::Borrowed(self.kind()),
        }
    }
}

/// Expected `log()` call.
#[derive(Debug)]
pub(crate) struct MessageExpectation {
    pub(crate) level: Level,
    /// Declared message text. Also the node's label, whichever matcher
    /// is active.
    pub(crate) text: String,
    pub(crate) matcher: MessageMatcher,
    pub(crate) error: Option<ErrorMatcher>,
}

impl MessageExpectation {
    fn new(level: Level, text: String) -> Self {
        Self {
            level,
            matcher: MessageMatcher::Exact(text.clone()),
            text,
            error: None,
        }
    }

    /// Switch to template-argument matching. A later call replaces an
    /// earlier one.
    pub(crate) fn set_arguments(&mut self, arguments: ArgumentsMatcher) {
        self.matcher = MessageMatcher::Arguments(arguments);
    }

    pub(crate) fn set_error(&mut self, error: ErrorMatcher) {
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn labels_name_the_kind() {
        assert_eq!(
            Expectation::message(Level::Information, "Missing log Information").label(),
            "Message: (Missing log Information)"
        );
        assert_eq!(
            Expectation::BeginScope(ScopeMatcher::Structural(json!({}))).label(),
            "BeginScope"
        );
        assert_eq!(Expectation::EndScope.label(), "EndScope");
    }

    #[test]
    fn messages_start_in_exact_mode() {
        let Expectation::Message(message) = Expectation::message(Level::Debug, "b") else {
            unreachable!()
        };
        assert!(matches!(&message.matcher, MessageMatcher::Exact(text) if text == "b"));
        assert!(message.error.is_none());
    }

    #[test]
    fn arguments_replace_exact_text_but_keep_label() {
        let mut node = Expectation::message(Level::Information, "Order {Id}");
        if let Expectation::Message(message) = &mut node {
            message.set_arguments(ArgumentsMatcher::Values(vec![json!(1)]));
            message.set_arguments(ArgumentsMatcher::Values(vec![json!(2)]));
        }

        let Expectation::Message(message) = &node else {
            unreachable!()
        };
        assert!(matches!(
            &message.matcher,
            MessageMatcher::Arguments(ArgumentsMatcher::Values(values)) if values == &[json!(2)]
        ));
        assert_eq!(node.label(), "Message: (Order {Id})");
    }
}
