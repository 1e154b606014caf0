#![cfg_attr(docsrs, feature(doc_cfg))]
//! # log-expect
//!
//! A strict, ordered test double for structured loggers.
//!
//! Declare the exact sequence of log messages and scopes the code under test
//! must produce, run it against the mock's logger, then verify. Any call that
//! diverges from the declaration fails the test immediately with a
//! descriptive message; verification fails if declared calls never happened.
//!
//! ## Quick Start
//!
//! ```rust
//! use log_expect::*;
//! use serde_json::json;
//!
//! struct OrderService<'a> {
//!     logger: &'a dyn Logger,
//! }
//!
//! impl OrderService<'_> {
//!     fn ship(&self, id: u32) {
//!         let _scope = self.logger.begin_scope(&json!({ "OrderId": id }));
//!         self.logger
//!             .log_message(Level::Information, LogValues::new("Shipping order {Id}").arg(id));
//!     }
//! }
//!
//! let mock = LoggerMock::new();
//! mock.setup_sequence()
//!     .begin_scope(json!({ "OrderId": 42 }))
//!     .log_information("Shipping order 42")
//!     .end_scope();
//!
//! OrderService { logger: &mock.logger() }.ship(42);
//! mock.verify();
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Logger`] | Structured logger interface seen by the code under test |
//! | [`LoggerMock`] | Owns the expected sequence; verifies it was fully consumed |
//! | [`Setup`] | Fluent declaration of expected calls ([`Sequence`], [`MessageSetup`], [`ErrorSetup`]) |
//! | [`Recorder`] | The [`Logger`] handed to the code under test |
//! | [`LogValues`] | Message template plus its named arguments |
//! | [`TemplateArguments`] | Arguments of a logged template, for argument assertions |
//! | [`ScopeState`] | Anything that can be passed as scope state |
//! | [`LoggedError`] | Anything that can be attached to a log call as its error |
//! | [`Error`] | Every way a logger call can diverge from the declaration |
//!
//! ## Matching
//!
//! A message matches on level first, then on either its rendered text or,
//! once arguments are declared, on its template arguments. A declared error
//! is matched by type and message, or handed to a closure. Scopes are
//! matched by type with a closure, or structurally against a value or a
//! mapping:
//!
//! ```rust,ignore
//! mock.setup_sequence()
//!     .begin_scope_with(|state: &RequestScope| assert_eq!(state.id, 7))
//!     .log_error("Request {Id} failed")
//!         .with_argument_values([7])
//!         .with_error(&io::Error::other("timeout"))
//!     .end_scope();
//! ```
//!
//! Failures panic, which is what fails a test. Every check is also
//! available as a `try_*` method on [`Recorder`] and [`LoggerMock`]
//! returning [`Result`].

mod config;
mod error;
mod expectation;
mod level;
mod log_values;
mod logged_error;
mod logger;
mod matcher;
mod mock;
mod recorder;
mod scope_state;
mod sequence;
mod setup;
mod template_arguments;

pub use config::Config;
pub use error::Error;
pub use level::Level;
pub use log_values::{LogValues, ORIGINAL_FORMAT_KEY};
pub use logged_error::LoggedError;
pub use logger::{Formatter, Logger, ScopeGuard};
pub use mock::LoggerMock;
pub use recorder::Recorder;
pub use scope_state::ScopeState;
pub use setup::{ErrorSetup, MessageSetup, Sequence, Setup};
pub use template_arguments::TemplateArguments;

/// Convenience alias for `Result<T, log_expect::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
