//! Payload matching: compares the data of an observed call against what an
//! expectation declared. Everything here is stateless; the recorder decides
//! which matcher applies and what happens after a match.

use std::{
    any::{Any, TypeId},
    fmt,
};

use serde_json::{Map, Value};

use crate::{
    Error, Level, LogValues, LoggedError, Result, ScopeState, TemplateArguments,
    log_values::ORIGINAL_FORMAT_KEY, logger::Formatter,
};

type ArgumentsCheck = Box<dyn Fn(&TemplateArguments)>;
type ScopeCheck = Box<dyn Fn(&dyn ScopeState) -> bool>;
type ErrorCheck = Box<dyn Fn(&dyn LoggedError)>;

/// How the payload of a `Message` expectation is compared.
pub(crate) enum MessageMatcher {
    /// The rendered message must equal this text.
    Exact(String),
    /// The template arguments are checked; the rendered text is not.
    Arguments(ArgumentsMatcher),
}

impl MessageMatcher {
    pub(crate) fn check(
        &self,
        level: Level,
        state: &LogValues,
        error: Option<&dyn LoggedError>,
        formatter: Formatter<'_>,
    ) -> Result {
        match self {
            MessageMatcher::Exact(expected) => {
                let actual = formatter(state, error);
                if actual != *expected {
                    return Err(Error::WrongMessage {
                        level,
                        expected: expected.clone(),
                        actual,
                    });
                }
                Ok(())
            }
            MessageMatcher::Arguments(arguments) => arguments.check(state),
        }
    }
}

impl fmt::Debug for MessageMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageMatcher::Exact(text) => f.debug_tuple("Exact").field(text).finish(),
            MessageMatcher::Arguments(arguments) => {
                f.debug_tuple("Arguments").field(arguments).finish()
            }
        }
    }
}

/// Template-argument assertion declared on a `Message` expectation.
pub(crate) enum ArgumentsMatcher {
    /// Exactly `count` arguments, then a caller assertion over them.
    Predicate { count: usize, check: ArgumentsCheck },
    /// Positional equality against literal values.
    Values(Vec<Value>),
}

impl ArgumentsMatcher {
    pub(crate) fn predicate(count: usize, check: impl Fn(&TemplateArguments) + 'static) -> Self {
        ArgumentsMatcher::Predicate {
            count,
            check: Box::new(check),
        }
    }

    fn expected_count(&self) -> usize {
        match self {
            ArgumentsMatcher::Predicate { count, .. } => *count,
            ArgumentsMatcher::Values(values) => values.len(),
        }
    }

    pub(crate) fn check(&self, state: &LogValues) -> Result {
        let mut template = String::new();
        let mut arguments = Vec::new();
        for (key, value) in state.pairs() {
            if key == ORIGINAL_FORMAT_KEY {
                template = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
            } else {
                arguments.push((key.to_string(), value));
            }
        }

        let expected = self.expected_count();
        if arguments.len() != expected {
            return Err(Error::WrongArgumentCount {
                template,
                expected,
                actual: arguments.len(),
            });
        }

        match self {
            ArgumentsMatcher::Predicate { check, .. } => {
                check(&TemplateArguments::new(arguments));
                Ok(())
            }
            ArgumentsMatcher::Values(values) => {
                for (index, (expected, (_, actual))) in values.iter().zip(&arguments).enumerate() {
                    if expected != actual {
                        return Err(Error::ArgumentMismatch {
                            index,
                            expected: expected.clone(),
                            actual: actual.clone(),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for ArgumentsMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentsMatcher::Predicate { count, .. } => f
                .debug_struct("Predicate")
                .field("count", count)
                .finish_non_exhaustive(),
            ArgumentsMatcher::Values(values) => f.debug_tuple("Values").field(values).finish(),
        }
    }
}

/// How the state of a `BeginScope` expectation is compared.
pub(crate) enum ScopeMatcher {
    /// Downcast to the declared type, then run a caller assertion.
    Typed {
        expected: &'static str,
        check: ScopeCheck,
    },
    /// Project the state and compare it with the projection of an expected
    /// value.
    Structural(Value),
    /// The state must already be a mapping equivalent to this one.
    Mapping(Map<String, Value>),
    /// The declared value could not be serialized; every state is rejected
    /// with that error.
    Unserializable(Error),
}

impl ScopeMatcher {
    pub(crate) fn typed<T: Any>(check: impl Fn(&T) + 'static) -> Self {
        ScopeMatcher::Typed {
            expected: std::any::type_name::<T>(),
            check: Box::new(move |state: &dyn ScopeState| match state.as_any().downcast_ref::<T>() {
                Some(state) => {
                    check(state);
                    true
                }
                None => false,
            }),
        }
    }

    /// Structural matcher for `expected`, or [`Unserializable`](Self::Unserializable)
    /// if it cannot be projected.
    pub(crate) fn structural(expected: &dyn ScopeState) -> Self {
        match expected.to_value() {
            Ok(value) => ScopeMatcher::Structural(value),
            Err(err) => ScopeMatcher::Unserializable(err),
        }
    }

    pub(crate) fn check(&self, state: &dyn ScopeState) -> Result {
        match self {
            ScopeMatcher::Typed { expected, check } => {
                if !check(state) {
                    return Err(Error::WrongStateType {
                        expected: *expected,
                        actual: state.type_name(),
                    });
                }
                Ok(())
            }
            ScopeMatcher::Structural(Value::Object(expected)) => {
                let actual = fields_of(state)?;
                equivalent_fields(&actual, expected)
            }
            ScopeMatcher::Structural(expected) => {
                let actual = state.to_value()?;
                if actual != *expected {
                    return Err(Error::StateMismatch {
                        expected: expected.clone(),
                        actual,
                    });
                }
                Ok(())
            }
            ScopeMatcher::Mapping(expected) => {
                let actual = fields_of(state)?;
                equivalent_fields(&actual, expected)
            }
            ScopeMatcher::Unserializable(err) => Err(err.clone()),
        }
    }
}

impl fmt::Debug for ScopeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeMatcher::Typed { expected, .. } => f
                .debug_struct("Typed")
                .field("expected", expected)
                .finish_non_exhaustive(),
            ScopeMatcher::Structural(value) => f.debug_tuple("Structural").field(value).finish(),
            ScopeMatcher::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            ScopeMatcher::Unserializable(err) => {
                f.debug_tuple("Unserializable").field(err).finish()
            }
        }
    }
}

fn fields_of(state: &dyn ScopeState) -> Result<Map<String, Value>> {
    state.to_fields()?.ok_or(Error::StateNotMapping {
        actual: state.type_name(),
    })
}

/// Key-by-key comparison of two projected states. Key sets are compared
/// before values; missing keys are reported before additional ones.
pub(crate) fn equivalent_fields(
    actual: &Map<String, Value>,
    expected: &Map<String, Value>,
) -> Result {
    let missing: Vec<String> = expected
        .keys()
        .filter(|key| !actual.contains_key(*key))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingStateKeys {
            expected: expected.len(),
            keys: missing,
        });
    }

    let additional: Vec<String> = actual
        .keys()
        .filter(|key| !expected.contains_key(*key))
        .cloned()
        .collect();
    if !additional.is_empty() {
        return Err(Error::AdditionalStateKeys {
            expected: expected.len(),
            keys: additional,
        });
    }

    for (key, expected_value) in expected {
        let actual_value = &actual[key];
        if actual_value != expected_value {
            return Err(Error::StateValueMismatch {
                key: key.clone(),
                expected: expected_value.clone(),
                actual: actual_value.clone(),
            });
        }
    }
    Ok(())
}

/// How the error attached to a `Message` expectation is compared.
pub(crate) enum ErrorMatcher {
    /// Same runtime kind and same message as a reference error.
    Literal {
        kind: &'static str,
        type_id: TypeId,
        message: String,
    },
    /// Caller assertion over the logged error.
    Delegate(ErrorCheck),
}

impl ErrorMatcher {
    pub(crate) fn literal<E: LoggedError>(expected: &E) -> Self {
        ErrorMatcher::Literal {
            kind: std::any::type_name::<E>(),
            type_id: TypeId::of::<E>(),
            message: expected.to_string(),
        }
    }

    pub(crate) fn delegate(check: impl Fn(&dyn LoggedError) + 'static) -> Self {
        ErrorMatcher::Delegate(Box::new(check))
    }

    pub(crate) fn check(&self, error: Option<&dyn LoggedError>) -> Result {
        let Some(error) = error else {
            return Err(Error::MissingError);
        };
        match self {
            ErrorMatcher::Literal {
                kind,
                type_id,
                message,
            } => {
                let actual_message = error.to_string();
                if Any::type_id(error.as_any()) != *type_id || actual_message != *message {
                    return Err(Error::ErrorMismatch {
                        expected_kind: *kind,
                        expected_message: message.clone(),
                        actual_kind: error.kind(),
                        actual_message,
                    });
                }
                Ok(())
            }
            ErrorMatcher::Delegate(check) => {
                check(error);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for ErrorMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMatcher::Literal { kind, message, .. } => f
                .debug_struct("Literal")
                .field("kind", kind)
                .field("message", message)
                .finish_non_exhaustive(),
            ErrorMatcher::Delegate(_) => f.debug_tuple("Delegate").finish_non_exhaustive(),
        }
    }
}
