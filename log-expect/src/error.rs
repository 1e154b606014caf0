use serde_json::Value;

use crate::Level;

/// The single error type for every assertion the mock performs.
///
/// Each variant is one way the observed logger calls can diverge from the
/// declared sequence. The `Display` text is assembled from fixed templates so
/// tests can compare it literally. The [`Logger`](crate::Logger)
/// implementation of the recorder and [`LoggerMock::verify`](crate::LoggerMock::verify)
/// turn these into panics; the `try_*` methods return them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("The '{method}' method has been called but expected other action (Expected: {expected})")]
    UnexpectedCall {
        method: &'static str,
        expected: String,
    },

    #[error("The logger has been called too many times (Expected: {expected} calls)")]
    TooManyCalls { expected: usize },

    #[error("Wrong log level for the log() method call. (Expected: {expected}, Actual: {actual})")]
    WrongLevel { expected: Level, actual: Level },

    #[error(
        "Wrong log message for the log({level}) method call. (Expected: '{expected}', Actual: '{actual}')"
    )]
    WrongMessage {
        level: Level,
        expected: String,
        actual: String,
    },

    #[error(
        "Incorrect template message argument count for the '{template}' template message. (Expected: '{expected}', Actual: '{actual}')"
    )]
    WrongArgumentCount {
        template: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Wrong value for the template message argument at index {index}. (Expected: {expected}, Actual: {actual})"
    )]
    ArgumentMismatch {
        index: usize,
        expected: Value,
        actual: Value,
    },

    #[error(
        "The 'begin_scope()' method has been called with a wrong state argument type (Expected: {expected}, Actual: {actual})."
    )]
    WrongStateType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("The scope state of type {actual} cannot be serialized: {reason}.")]
    StateNotSerializable {
        actual: &'static str,
        reason: String,
    },

    #[error("Expected state to be a mapping, but found {actual}.")]
    StateNotMapping { actual: &'static str },

    #[error(
        "Expected state to be a mapping with {expected} item(s), but it misses key(s) {{{}}}",
        quoted(.keys)
    )]
    MissingStateKeys { expected: usize, keys: Vec<String> },

    #[error(
        "Expected state to be a mapping with {expected} item(s), but has additional key(s) {{{}}}",
        quoted(.keys)
    )]
    AdditionalStateKeys { expected: usize, keys: Vec<String> },

    #[error("Expected state member \"{key}\" to be {expected}, but found {actual}.")]
    StateValueMismatch {
        key: String,
        expected: Value,
        actual: Value,
    },

    #[error("Expected state to be {expected}, but found {actual}.")]
    StateMismatch { expected: Value, actual: Value },

    #[error("Expected an error but no error has been logged.")]
    MissingError,

    #[error(
        "Expected error to refer to {expected_kind} with message \"{expected_message}\", but found {actual_kind} with message \"{actual_message}\"."
    )]
    ErrorMismatch {
        expected_kind: &'static str,
        expected_message: String,
        actual_kind: &'static str,
        actual_message: String,
    },

    #[error(
        "The logger has been called too few times (Expected: {expected} calls, Actual: {actual} calls).{}",
        bullets(.missing)
    )]
    IncompleteSequence {
        expected: usize,
        actual: usize,
        missing: Vec<String>,
    },

    #[error("The mock of this method is not supported by the '{library}' library.")]
    Unsupported { library: String },
}

fn quoted(keys: &[String]) -> String {
    keys.iter()
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bullets(labels: &[String]) -> String {
    labels.iter().map(|l| format!("\n- {l}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_sequence_lists_labels_one_per_line() {
        let err = Error::IncompleteSequence {
            expected: 4,
            actual: 2,
            missing: vec!["Message: (late)".into(), "EndScope".into()],
        };
        assert_eq!(
            err.to_string(),
            "The logger has been called too few times (Expected: 4 calls, Actual: 2 calls).\n- Message: (late)\n- EndScope"
        );
    }

    #[test]
    fn key_lists_are_quoted_inside_braces() {
        let err = Error::MissingStateKeys {
            expected: 3,
            keys: vec!["ScopeName".into(), "Extra".into()],
        };
        assert_eq!(
            err.to_string(),
            "Expected state to be a mapping with 3 item(s), but it misses key(s) {\"ScopeName\", \"Extra\"}"
        );
    }

    #[test]
    fn unserializable_state_names_type_and_reason() {
        let err = Error::StateNotSerializable {
            actual: "app::Session",
            reason: "key must be a string".into(),
        };
        assert_eq!(
            err.to_string(),
            "The scope state of type app::Session cannot be serialized: key must be a string."
        );
    }

    #[test]
    fn argument_mismatch_renders_values_as_json() {
        let err = Error::ArgumentMismatch {
            index: 1,
            expected: Value::from("a"),
            actual: Value::from(2),
        };
        assert_eq!(
            err.to_string(),
            "Wrong value for the template message argument at index 1. (Expected: \"a\", Actual: 2)"
        );
    }
}
