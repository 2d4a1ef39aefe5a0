//! Opt-in typed handling for specific fragment keys.

use crate::fragment::Fragment;
use crate::resource::Resource;
use crate::value::Value;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type DecodeFn = dyn Fn(&serde_json::Value) -> Option<Fragment> + Send + Sync;
type EncodeFn = dyn Fn(&Fragment) -> Option<serde_json::Value> + Send + Sync;

/// Decode/encode pair for one registered fragment key.
pub struct FragmentCodec {
    decode: Box<DecodeFn>,
    encode: Box<EncodeFn>,
}

impl FragmentCodec {
    /// Run the registered decoder on a raw wire value.
    ///
    /// `None` means the value did not match the registered type; the caller
    /// drops the key rather than falling back to generic handling.
    pub fn decode_wire(&self, raw: &serde_json::Value) -> Option<Fragment> {
        (self.decode)(raw)
    }

    /// Run the registered encoder on a stored fragment.
    pub fn encode_wire(&self, fragment: &Fragment) -> Option<serde_json::Value> {
        (self.encode)(fragment)
    }
}

impl fmt::Debug for FragmentCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentCodec").finish_non_exhaustive()
    }
}

/// Table of typed fragment handlers, keyed by (resource type, wire key).
///
/// The registry is constructed explicitly and shared by reference — there
/// is no ambient global table. Registration is start-up configuration;
/// lookups happen on every decode/encode of every affected resource,
/// potentially concurrently across many in-flight requests, so the table
/// sits behind a `RwLock` (writes at start-up, shared reads after).
///
/// Lookup is by exact key; there is no wildcard or prefix matching.
/// Registering a key twice silently replaces the earlier entry. There is
/// no unregister.
#[derive(Default)]
pub struct FragmentRegistry {
    codecs: RwLock<HashMap<TypeId, HashMap<String, Arc<FragmentCodec>>>>,
}

impl FragmentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register concrete type `T` for fragment `key` on resource `R`.
    ///
    /// Decoding a value at `key` then attempts to materialize it as `T`.
    /// A value that does not match the type is dropped by the codec — it is
    /// *not* downgraded to a generic value, since the caller explicitly
    /// typed this key. Encoding serializes the stored `T`; a generic value
    /// stored at the key still encodes generically.
    pub fn register<R, T>(&self, key: impl Into<String>)
    where
        R: Resource,
        T: DeserializeOwned + Serialize + Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        let codec = FragmentCodec {
            decode: Box::new(|raw: &serde_json::Value| {
                serde_json::from_value::<T>(raw.clone())
                    .ok()
                    .map(|typed| Fragment::Typed(Box::new(typed)))
            }),
            encode: Box::new(|fragment: &Fragment| match fragment {
                Fragment::Typed(t) => t
                    .as_any()
                    .downcast_ref::<T>()
                    .and_then(|typed| serde_json::to_value(typed).ok()),
                Fragment::Value(v) => Some(serde_json::Value::from(v.clone())),
            }),
        };
        self.insert(TypeId::of::<R>(), key.into(), codec);
    }

    /// Register generic pass-through handling for fragment `key` on `R`.
    ///
    /// Equivalent to the default behavior for unregistered keys; useful to
    /// opt a key into the registry explicitly without a concrete type.
    pub fn register_passthrough<R: Resource>(&self, key: impl Into<String>) {
        let codec = FragmentCodec {
            decode: Box::new(|raw: &serde_json::Value| Some(Fragment::Value(Value::from(raw)))),
            encode: Box::new(Fragment::to_wire),
        };
        self.insert(TypeId::of::<R>(), key.into(), codec);
    }

    /// The codec registered for `(resource, key)`, if any.
    pub fn lookup(&self, resource: TypeId, key: &str) -> Option<Arc<FragmentCodec>> {
        let codecs = self.codecs.read().unwrap_or_else(PoisonError::into_inner);
        codecs.get(&resource)?.get(key).cloned()
    }

    fn insert(&self, resource: TypeId, key: String, codec: FragmentCodec) {
        let mut codecs = self.codecs.write().unwrap_or_else(PoisonError::into_inner);
        codecs
            .entry(resource)
            .or_default()
            .insert(key, Arc::new(codec));
    }
}

impl fmt::Debug for FragmentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codecs = self.codecs.read().unwrap_or_else(PoisonError::into_inner);
        let entries: usize = codecs.values().map(HashMap::len).sum();
        f.debug_struct("FragmentRegistry")
            .field("entries", &entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragments;
    use crate::resource::{Object, opt_field, put_opt_field};
    use crate::error::DecodeError;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Probe {
        id: Option<String>,
        fragments: Fragments,
    }

    impl Resource for Probe {
        const NAME: &'static str = "probe";
        const FIELD_KEYS: &'static [&'static str] = &["id"];

        fn decode_fields(obj: &Object) -> Result<Self, DecodeError> {
            Ok(Self {
                id: opt_field(obj, Self::NAME, "id", "id")?,
                fragments: Fragments::new(),
            })
        }

        fn encode_fields(&self, obj: &mut Object) {
            put_opt_field(obj, "id", &self.id);
        }

        fn fragments(&self) -> &Fragments {
            &self.fragments
        }

        fn fragments_mut(&mut self) -> &mut Fragments {
            &mut self.fragments
        }
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct OtherProbe {
        fragments: Fragments,
    }

    impl Resource for OtherProbe {
        const NAME: &'static str = "otherProbe";
        const FIELD_KEYS: &'static [&'static str] = &[];

        fn decode_fields(_obj: &Object) -> Result<Self, DecodeError> {
            Ok(Self::default())
        }

        fn encode_fields(&self, _obj: &mut Object) {}

        fn fragments(&self) -> &Fragments {
            &self.fragments
        }

        fn fragments_mut(&mut self) -> &mut Fragments {
            &mut self.fragments
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Level {
        percent: i64,
    }

    #[test]
    fn lookup_is_per_resource_type() {
        let registry = FragmentRegistry::new();
        registry.register::<Probe, Level>("battery");

        assert!(registry.lookup(TypeId::of::<Probe>(), "battery").is_some());
        assert!(
            registry
                .lookup(TypeId::of::<OtherProbe>(), "battery")
                .is_none()
        );
        assert!(registry.lookup(TypeId::of::<Probe>(), "batter").is_none());
    }

    #[test]
    fn typed_decode_rejects_wrong_shape() {
        let registry = FragmentRegistry::new();
        registry.register::<Probe, Level>("battery");

        let codec = registry
            .lookup(TypeId::of::<Probe>(), "battery")
            .expect("registered");
        assert!(codec.decode_wire(&json!({"percent": 80})).is_some());
        // Wrong shape: no fragment, not a generic fallback.
        assert!(codec.decode_wire(&json!({"percent": "full"})).is_none());
        assert!(codec.decode_wire(&json!("full")).is_none());
    }

    #[test]
    fn later_registration_replaces_silently() {
        let registry = FragmentRegistry::new();
        registry.register::<Probe, Level>("battery");
        registry.register_passthrough::<Probe>("battery");

        let codec = registry
            .lookup(TypeId::of::<Probe>(), "battery")
            .expect("registered");
        // The pass-through decoder accepts anything.
        let fragment = codec.decode_wire(&json!("full")).expect("pass-through");
        assert_eq!(fragment.as_value().and_then(Value::as_str), Some("full"));
    }

    #[test]
    fn typed_encode_handles_generic_entries() {
        let registry = FragmentRegistry::new();
        registry.register::<Probe, Level>("battery");
        let codec = registry
            .lookup(TypeId::of::<Probe>(), "battery")
            .expect("registered");

        // A generic value stored at a registered key still encodes.
        let generic = Fragment::Value(Value::from(5));
        assert_eq!(codec.encode_wire(&generic), Some(json!(5)));

        // A typed entry of the wrong concrete type does not.
        let alien = Fragment::Typed(Box::new("hello".to_string()));
        assert_eq!(codec.encode_wire(&alien), None);
    }
}
