//! Structured state of a single log call.

use std::fmt;

use serde_json::Value;

use crate::LoggedError;

/// Reserved key under which [`LogValues::pairs`] exposes the unformatted
/// message template.
pub const ORIGINAL_FORMAT_KEY: &str = "{OriginalFormat}";

/// The state passed to [`Logger::log`](crate::Logger::log): a message
/// template plus the values substituted into its placeholders.
///
/// Arguments added with [`arg`](Self::arg) take their name from the
/// template's placeholders, in order:
///
/// ```rust
/// use log_expect::LogValues;
///
/// let values = LogValues::new("Order {Id} shipped to {City}")
///     .arg(1234)
///     .arg("Lyon");
///
/// assert_eq!(values.format(), "Order 1234 shipped to Lyon");
/// assert_eq!(values.arguments()[1].0, "City");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogValues {
    template: String,
    arguments: Vec<(String, Value)>,
}

impl LogValues {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            arguments: Vec::new(),
        }
    }

    /// Append a value for the next placeholder of the template.
    ///
    /// Values beyond the last placeholder are named by their position.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        let position = self.arguments.len();
        let name = placeholder_names(&self.template)
            .into_iter()
            .nth(position)
            .unwrap_or_else(|| position.to_string());
        self.arguments.push((name, value.into()));
        self
    }

    /// Append a value under an explicit name.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    /// The unformatted message template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The template arguments, in the order they were supplied.
    pub fn arguments(&self) -> &[(String, Value)] {
        &self.arguments
    }

    /// All key/value pairs of the state: every argument followed by the
    /// template itself under [`ORIGINAL_FORMAT_KEY`].
    pub fn pairs(&self) -> Vec<(&str, Value)> {
        self.arguments
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .chain(std::iter::once((
                ORIGINAL_FORMAT_KEY,
                Value::String(self.template.clone()),
            )))
            .collect()
    }

    /// Render the message by substituting arguments into placeholders by
    /// position.
    ///
    /// `{{` and `}}` render as literal braces, a placeholder with no matching
    /// argument renders verbatim, strings render without quotes and `null`
    /// renders as `(null)`.
    pub fn format(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut position = 0;
        for segment in segments(&self.template) {
            match segment {
                Segment::Text(text) => out.push_str(&text),
                Segment::Hole(content) => {
                    match self.arguments.get(position) {
                        Some((_, value)) => out.push_str(&render_value(value)),
                        None => {
                            out.push('{');
                            out.push_str(content);
                            out.push('}');
                        }
                    }
                    position += 1;
                }
            }
        }
        out
    }

    /// Formatter matching the signature expected by
    /// [`Logger::log`](crate::Logger::log). The error is not part of the
    /// rendered message.
    pub fn formatter(values: &LogValues, _error: Option<&dyn LoggedError>) -> String {
        values.format()
    }
}

impl fmt::Display for LogValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<&str> for LogValues {
    fn from(message: &str) -> Self {
        LogValues::new(message)
    }
}

impl From<String> for LogValues {
    fn from(message: String) -> Self {
        LogValues::new(message)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(null)".to_string(),
        other => other.to_string(),
    }
}

enum Segment<'a> {
    Text(String),
    Hole(&'a str),
}

fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        match c {
            '{' if rest.starts_with("{{") => {
                text.push('{');
                rest = &rest[2..];
            }
            '}' if rest.starts_with("}}") => {
                text.push('}');
                rest = &rest[2..];
            }
            '{' => match rest.find('}') {
                Some(end) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Hole(&rest[1..end]));
                    rest = &rest[end + 1..];
                }
                // Unterminated placeholder: the remainder is plain text.
                None => {
                    text.push_str(rest);
                    rest = "";
                }
            },
            _ => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

/// Placeholder names of a template, in order. Alignment and format
/// specifiers (`{Amount,10:N2}`) are not part of the name.
pub(crate) fn placeholder_names(template: &str) -> Vec<String> {
    segments(template)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Hole(content) => {
                let end = content.find([',', ':']).unwrap_or(content.len());
                Some(content[..end].trim().to_string())
            }
            Segment::Text(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arguments_are_named_after_placeholders() {
        let values = LogValues::new("Log {Id}, {Name} and {Object}")
            .arg(1234)
            .arg("The name")
            .arg(json!({ "Property": "I am object" }));

        let names: Vec<&str> = values.arguments().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["Id", "Name", "Object"]);
    }

    #[test]
    fn extra_arguments_are_named_by_position() {
        let values = LogValues::new("Only {One}").arg(1).arg(2);
        assert_eq!(values.arguments()[1].0, "1");
    }

    #[test]
    fn pairs_end_with_original_format() {
        let values = LogValues::new("Log Trace {0}").arg(1);
        let pairs = values.pairs();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("0", json!(1)));
        assert_eq!(pairs[1], (ORIGINAL_FORMAT_KEY, json!("Log Trace {0}")));
    }

    #[test]
    fn format_substitutes_by_position() {
        let values = LogValues::new("Log Trace {0}").arg(1);
        assert_eq!(values.format(), "Log Trace 1");
    }

    #[test]
    fn format_keeps_escaped_braces_and_missing_placeholders() {
        let values = LogValues::new("{{literal}} {A} {B}").arg("x");
        assert_eq!(values.format(), "{literal} x {B}");
    }

    #[test]
    fn format_renders_null_and_structured_values() {
        let values = LogValues::new("{A} {B}")
            .arg(Value::Null)
            .arg(json!({ "k": 1 }));
        assert_eq!(values.format(), "(null) {\"k\":1}");
    }

    #[test]
    fn unterminated_placeholder_is_text() {
        let values = LogValues::new("broken {Id").arg(1);
        assert_eq!(values.format(), "broken {Id");
        assert_eq!(values.arguments()[0].0, "0");
    }

    #[test]
    fn placeholder_names_drop_format_specifiers() {
        assert_eq!(
            placeholder_names("{Amount,10:N2} at {When:u}"),
            ["Amount", "When"]
        );
    }
}
