/// Configuration of a [`LoggerMock`](crate::LoggerMock).
///
/// Use the builder methods to customize, or [`Default`] for the usual
/// setup.
///
/// # Examples
///
/// ```rust
/// use log_expect::{Config, LoggerMock};
///
/// struct OrderService;
///
/// let config = Config::default()
///     .with_category_of::<OrderService>()   // logger category, like `Logger<T>`
///     .with_library_name("my-test-kit");   // named by unsupported calls
/// let mock = LoggerMock::with_config(config);
/// assert!(mock.logger().category().unwrap().ends_with("OrderService"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Name reported by calls the mock does not support.
    /// Default: the name of this crate
    library_name: String,

    /// Category of the mocked logger, usually the type that owns it.
    /// Default: none
    category: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            library_name: env!("CARGO_PKG_NAME").to_string(),
            category: None,
        }
    }
}

impl Config {
    /// Set the library name reported by unsupported calls.
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }

    /// Returns the library name reported by unsupported calls.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// Set the logger category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the logger category to the type name of `T`.
    pub fn with_category_of<T: ?Sized>(self) -> Self {
        self.with_category(std::any::type_name::<T>())
    }

    /// Returns the logger category, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}
