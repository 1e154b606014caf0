use std::{any::Any, fmt};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// The state passed to [`Logger::begin_scope`](crate::Logger::begin_scope).
///
/// Implemented for every `'static` type that is `Serialize + Debug`, which
/// covers plain structs, `HashMap`/`BTreeMap` mappings and `serde_json`
/// values. The mock inspects a state in two ways: by downcasting to a
/// concrete type for typed delegates, or by projecting it to a mapping of
/// member name to value for structural comparisons.
pub trait ScopeState: Any + fmt::Debug {
    /// Fully qualified type name of the concrete state.
    fn type_name(&self) -> &'static str;

    /// The concrete state, for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Serialized form of the state.
    ///
    /// Fails with [`Error::StateNotSerializable`] when the `Serialize` impl
    /// reports an error, e.g. for maps whose keys are not strings.
    fn to_value(&self) -> Result<Value>;

    /// The state projected to a mapping, or `None` if it does not serialize
    /// to one.
    fn to_fields(&self) -> Result<Option<Map<String, Value>>> {
        match self.to_value()? {
            Value::Object(fields) => Ok(Some(fields)),
            _ => Ok(None),
        }
    }
}

impl<S: Serialize + fmt::Debug + Any> ScopeState for S {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<S>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::StateNotSerializable {
            actual: self.type_name(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct State {
        scope_level: u32,
        scope_name: String,
    }

    #[test]
    fn structs_project_to_their_fields() {
        let state = State {
            scope_level: 1,
            scope_name: "Scope level 1".into(),
        };
        let fields = state
            .to_fields()
            .unwrap()
            .expect("struct should project to a mapping");
        assert_eq!(fields.get("ScopeLevel"), Some(&json!(1)));
        assert_eq!(fields.get("ScopeName"), Some(&json!("Scope level 1")));
    }

    #[test]
    fn maps_project_to_themselves() {
        let state: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
        let fields = state
            .to_fields()
            .unwrap()
            .expect("map should project to a mapping");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn scalars_do_not_project() {
        assert_eq!(42u8.to_fields(), Ok(None));
        assert_eq!("request 123".to_fields(), Ok(None));
    }

    #[test]
    fn non_string_map_keys_fail_to_serialize() {
        let state: HashMap<(u8, u8), i32> = HashMap::from([((1, 2), 3)]);
        let err = state.to_value().unwrap_err();
        assert!(matches!(
            err,
            Error::StateNotSerializable { actual, .. } if actual == std::any::type_name::<HashMap<(u8, u8), i32>>()
        ));
    }

    #[test]
    fn downcasts_through_trait_object() {
        let state = State {
            scope_level: 2,
            scope_name: "inner".into(),
        };
        let erased: &dyn ScopeState = &state;
        assert!(erased.type_name().ends_with("State"));
        assert_eq!(
            erased.as_any().downcast_ref::<State>().map(|s| s.scope_level),
            Some(2)
        );
    }
}
