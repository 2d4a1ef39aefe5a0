//! Custom fragment storage: the open part of every resource.

use crate::value::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Object-safe erasure for statically-typed fragment values.
///
/// Blanket-implemented for every type that is cloneable, comparable,
/// debuggable and serializable — a plain `#[derive]` struct qualifies.
/// Callers never implement this by hand; they implement `Serialize` /
/// `Deserialize` and register the type with a
/// [`FragmentRegistry`](crate::FragmentRegistry).
pub trait TypedFragment: Any + fmt::Debug + Send + Sync {
    /// Upcast for downcasting back to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Clone behind the trait object.
    fn clone_boxed(&self) -> Box<dyn TypedFragment>;

    /// Equality across trait objects; `false` when the concrete types differ.
    fn fragment_eq(&self, other: &dyn TypedFragment) -> bool;

    /// The wire form of this fragment, `None` if it cannot be serialized.
    fn to_wire(&self) -> Option<serde_json::Value>;
}

impl<T> TypedFragment for T
where
    T: Any + fmt::Debug + Clone + PartialEq + serde::Serialize + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn TypedFragment> {
        Box::new(self.clone())
    }

    fn fragment_eq(&self, other: &dyn TypedFragment) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }

    fn to_wire(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

/// One entry in a resource's fragment map.
///
/// Fragments with no registered type stay generic [`Value`] trees; a
/// registered key is materialized as the concrete type instead.
#[derive(Debug)]
pub enum Fragment {
    /// A generic, schema-less fragment.
    Value(Value),
    /// A fragment materialized as a registered concrete type.
    Typed(Box<dyn TypedFragment>),
}

impl Fragment {
    /// The generic value, if this fragment was not materialized as a type.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Fragment::Value(v) => Some(v),
            Fragment::Typed(_) => None,
        }
    }

    /// Downcast a typed fragment to its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Fragment::Typed(t) => t.as_any().downcast_ref(),
            Fragment::Value(_) => None,
        }
    }

    /// The wire form of this fragment, `None` if it cannot be serialized.
    pub fn to_wire(&self) -> Option<serde_json::Value> {
        match self {
            Fragment::Value(v) => Some(serde_json::Value::from(v.clone())),
            Fragment::Typed(t) => t.to_wire(),
        }
    }
}

impl Clone for Fragment {
    fn clone(&self) -> Self {
        match self {
            Fragment::Value(v) => Fragment::Value(v.clone()),
            Fragment::Typed(t) => Fragment::Typed(t.clone_boxed()),
        }
    }
}

impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Fragment::Value(a), Fragment::Value(b)) => a == b,
            (Fragment::Typed(a), Fragment::Typed(b)) => a.fragment_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl From<Value> for Fragment {
    fn from(value: Value) -> Self {
        Fragment::Value(value)
    }
}

/// The fragment map carried by every open resource.
///
/// Keys are wire keys chosen by the platform or the caller; they never
/// collide with a resource's declared field keys because the codec routes
/// declared keys through typed field mapping and everything else here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragments {
    entries: BTreeMap<String, Fragment>,
}

impl Fragments {
    /// An empty fragment map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fragment stored at `key`.
    pub fn get(&self, key: &str) -> Option<&Fragment> {
        self.entries.get(key)
    }

    /// The generic value at `key`, if present and not typed.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(Fragment::as_value)
    }

    /// The typed fragment at `key`, downcast to `T`.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(Fragment::downcast_ref)
    }

    /// Store a generic value at `key`, replacing any previous entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), Fragment::Value(value.into()));
    }

    /// Store a typed fragment at `key`, replacing any previous entry.
    pub fn set_typed<T: TypedFragment>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Fragment::Typed(Box::new(value)));
    }

    /// Store an already-built fragment at `key`.
    pub fn insert(&mut self, key: impl Into<String>, fragment: Fragment) {
        self.entries.insert(key.into(), fragment);
    }

    /// Remove and return the fragment at `key`.
    pub fn remove(&mut self, key: &str) -> Option<Fragment> {
        self.entries.remove(key)
    }

    /// Whether a fragment exists at `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All fragment keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries, in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reading {
        value: f64,
        unit: String,
    }

    #[test]
    fn generic_set_and_get() {
        let mut fragments = Fragments::new();
        fragments.set("battery", 87);
        assert_eq!(fragments.value("battery"), Some(&Value::Int(87)));
        assert!(fragments.contains("battery"));
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn typed_set_and_downcast() {
        let mut fragments = Fragments::new();
        let reading = Reading {
            value: 21.5,
            unit: "C".into(),
        };
        fragments.set_typed("temperature", reading.clone());

        assert_eq!(fragments.get_as::<Reading>("temperature"), Some(&reading));
        // A typed fragment is not visible through the generic accessor.
        assert_eq!(fragments.value("temperature"), None);
        // Nor through a downcast to the wrong type.
        assert_eq!(fragments.get_as::<String>("temperature"), None);
    }

    #[test]
    fn typed_equality_is_by_concrete_type() {
        let a = Fragment::Typed(Box::new(Reading {
            value: 1.0,
            unit: "V".into(),
        }));
        let b = Fragment::Typed(Box::new(Reading {
            value: 1.0,
            unit: "V".into(),
        }));
        let c = Fragment::Typed(Box::new("V".to_string()));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Fragment::Value(Value::Null));
    }

    #[test]
    fn clone_preserves_typed_fragments() {
        let mut fragments = Fragments::new();
        fragments.set_typed(
            "temperature",
            Reading {
                value: 3.0,
                unit: "C".into(),
            },
        );
        fragments.set("note", "ok");
        let copy = fragments.clone();
        assert_eq!(copy, fragments);
    }

    #[test]
    fn to_wire_covers_both_arms() {
        let generic = Fragment::Value(Value::from(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(generic.to_wire(), Some(json!([1, 2])));

        let typed = Fragment::Typed(Box::new(Reading {
            value: 2.5,
            unit: "A".into(),
        }));
        assert_eq!(typed.to_wire(), Some(json!({"value": 2.5, "unit": "A"})));
    }

    #[test]
    fn replace_semantics() {
        let mut fragments = Fragments::new();
        fragments.set("slot", 1);
        fragments.set("slot", 2);
        assert_eq!(fragments.value("slot"), Some(&Value::Int(2)));
        assert_eq!(fragments.remove("slot").and_then(|f| f.as_value().cloned()), Some(Value::Int(2)));
        assert!(fragments.is_empty());
    }
}
