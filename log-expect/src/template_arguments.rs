use std::{fmt, ops::Index};

use serde_json::Value;

/// The template arguments of a logged message, handed to the predicate
/// declared with [`MessageSetup::with_arguments`](crate::MessageSetup::with_arguments).
///
/// Arguments are addressable by position and by placeholder name. The
/// reserved original-format entry is never part of them.
///
/// ```rust
/// # use log_expect::TemplateArguments;
/// # use serde_json::json;
/// let args = TemplateArguments::new(vec![("Id".into(), json!(1234))]);
///
/// assert_eq!(args[0], json!(1234));
/// assert_eq!(args["Id"], json!(1234));
/// assert!(args.get("Name").is_none());
/// ```
#[derive(Clone, PartialEq)]
pub struct TemplateArguments {
    arguments: Vec<(String, Value)>,
}

impl TemplateArguments {
    pub fn new(arguments: Vec<(String, Value)>) -> Self {
        Self { arguments }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Value of the argument named `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Value of the argument at `index`, if in range.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index).map(|(_, value)| value)
    }

    /// Argument names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().map(|(key, _)| key.as_str())
    }

    /// Argument values, in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.arguments.iter().map(|(_, value)| value)
    }
}

impl Index<usize> for TemplateArguments {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self.at(index) {
            Some(value) => value,
            None => panic!(
                "The message template argument index {index} is out of range ({} argument(s)).",
                self.len()
            ),
        }
    }
}

impl Index<&str> for TemplateArguments {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(value) => value,
            None => panic!("The given message template argument '{name}' was not present."),
        }
    }
}

impl<'a> IntoIterator for &'a TemplateArguments {
    type Item = &'a Value;
    type IntoIter = Box<dyn Iterator<Item = &'a Value> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Debug for TemplateArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.arguments.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> TemplateArguments {
        TemplateArguments::new(vec![
            ("A".into(), json!("The A")),
            ("B".into(), json!(1234)),
            ("C".into(), Value::Null),
        ])
    }

    #[test]
    fn len_counts_arguments() {
        assert_eq!(sample().len(), 3);
        assert!(!sample().is_empty());
        assert!(TemplateArguments::new(Vec::new()).is_empty());
    }

    #[test]
    fn index_by_position() {
        let args = sample();
        assert_eq!(args[0], json!("The A"));
        assert_eq!(args[1], json!(1234));
        assert_eq!(args[2], Value::Null);
    }

    #[test]
    fn index_by_name() {
        let args = sample();
        assert_eq!(args["A"], json!("The A"));
        assert_eq!(args["B"], json!(1234));
        assert_eq!(args["C"], Value::Null);
    }

    #[test]
    #[should_panic(expected = "index 3 is out of range (3 argument(s))")]
    fn index_out_of_range_panics() {
        let _ = &sample()[3];
    }

    #[test]
    #[should_panic(expected = "The given message template argument 'D' was not present.")]
    fn unknown_name_panics() {
        let _ = &sample()["D"];
    }

    #[test]
    fn iterates_values_in_order() {
        let args = sample();
        let values: Vec<&Value> = (&args).into_iter().collect();
        assert_eq!(values, [&json!("The A"), &json!(1234), &Value::Null]);
        assert_eq!(args.names().collect::<Vec<_>>(), ["A", "B", "C"]);
    }
}
