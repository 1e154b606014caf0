use std::any::Any;

/// An error attached to a log call, seen through an object-safe lens.
///
/// Implemented for every `'static` error type, so code under test passes
/// `Some(&my_error)` without ceremony. The mock compares errors by runtime
/// kind and message, never by identity: an equal error built separately in
/// the test matches.
pub trait LoggedError: std::error::Error + Any {
    /// Fully qualified type name of the concrete error.
    fn kind(&self) -> &'static str;

    /// The concrete error, for downcasting in error delegates.
    fn as_any(&self) -> &dyn Any;
}

impl<E: std::error::Error + Any> LoggedError for E {
    fn kind(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn LoggedError + '_ {
    /// Returns true if the concrete error is an `E`.
    pub fn is<E: Any>(&self) -> bool {
        self.as_any().downcast_ref::<E>().is_some()
    }

    /// Returns the concrete error if it is an `E`.
    pub fn downcast_ref<E: Any>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug)]
    struct FormatError(&'static str);

    impl fmt::Display for FormatError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for FormatError {}

    #[test]
    fn kind_is_the_concrete_type_name() {
        let err = FormatError("bad");
        let logged: &dyn LoggedError = &err;
        assert!(logged.kind().ends_with("FormatError"));
        assert_eq!(logged.to_string(), "bad");
    }

    #[test]
    fn downcasts_to_the_concrete_type() {
        let err = FormatError("bad");
        let logged: &dyn LoggedError = &err;
        assert!(logged.is::<FormatError>());
        assert!(!logged.is::<std::io::Error>());
        assert_eq!(logged.downcast_ref::<FormatError>().map(|e| e.0), Some("bad"));
    }

    #[test]
    fn io_errors_are_loggable() {
        let err = std::io::Error::other("disk full");
        let logged: &dyn LoggedError = &err;
        assert_eq!(logged.kind(), std::any::type_name::<std::io::Error>());
    }
}
