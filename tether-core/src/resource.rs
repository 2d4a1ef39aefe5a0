//! Declared-field mapping and the open-record codec.
//!
//! Every platform resource has a fixed set of declared fields (each with a
//! wire key and a static type) plus an open fragment map. One generic codec
//! handles all resource types: [`decode`] maps declared fields through
//! typed lookups, then harvests every remaining wire key into the fragment
//! map, consulting the [`FragmentRegistry`] per key. [`encode`] is the
//! mirror image.

use crate::error::DecodeError;
use crate::fragment::{Fragment, Fragments};
use crate::registry::FragmentRegistry;
use crate::value::Value;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::TypeId;

/// The wire-format container: a JSON object.
pub type Object = serde_json::Map<String, serde_json::Value>;

/// A resource with declared fields and an open fragment map.
///
/// Implementations supply the declared-field table (`FIELD_KEYS` plus the
/// two mapping functions) and expose their fragment map; the generic codec
/// does the rest. `FIELD_KEYS` must list every wire key consumed by
/// `decode_fields` — the fragment scan skips exactly those keys.
pub trait Resource: Sized + 'static {
    /// Resource type name, used in decode errors.
    const NAME: &'static str;

    /// Wire keys claimed by declared fields.
    const FIELD_KEYS: &'static [&'static str];

    /// Decode the declared fields from a wire container.
    ///
    /// Failures here are fatal to the whole record: either every declared
    /// field decodes, or the caller sees a single structured error.
    fn decode_fields(obj: &Object) -> Result<Self, DecodeError>;

    /// Emit the declared fields that are set into a wire container.
    ///
    /// Unset optional fields are omitted, never emitted as explicit nulls.
    fn encode_fields(&self, obj: &mut Object);

    /// The resource's fragment map.
    fn fragments(&self) -> &Fragments;

    /// Mutable access to the resource's fragment map.
    fn fragments_mut(&mut self) -> &mut Fragments;
}

/// Typed lookup of an optional declared field.
///
/// Absent keys and explicit JSON nulls both read as `None`. A present value
/// of the wrong shape is a [`DecodeError::TypeMismatch`].
pub fn opt_field<T: DeserializeOwned>(
    obj: &Object,
    resource: &'static str,
    field: &'static str,
    key: &'static str,
) -> Result<Option<T>, DecodeError> {
    match obj.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|source| DecodeError::TypeMismatch {
                resource,
                field,
                key,
                source,
            }),
    }
}

/// Typed lookup of a required declared field.
pub fn req_field<T: DeserializeOwned>(
    obj: &Object,
    resource: &'static str,
    field: &'static str,
    key: &'static str,
) -> Result<T, DecodeError> {
    opt_field(obj, resource, field, key)?.ok_or(DecodeError::MissingField {
        resource,
        field,
        key,
    })
}

/// Emit one declared field at its wire key.
pub fn put_field<T: Serialize>(obj: &mut Object, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(wire) => {
            obj.insert(key.to_string(), wire);
        }
        Err(error) => {
            tracing::debug!(key = %key, %error, "skipping field that failed to serialize");
        }
    }
}

/// Emit an optional declared field; `None` emits nothing.
pub fn put_opt_field<T: Serialize>(obj: &mut Object, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        put_field(obj, key, value);
    }
}

/// Decode a resource from a wire payload.
///
/// Declared fields decode first; any failure there is fatal and names the
/// resource, field and wire key. Every remaining key is then harvested into
/// the fragment map: a key registered in `registry` goes through its typed
/// decoder (and is dropped, with a debug log, when the value does not match
/// the registered type), any other key is stored as a generic [`Value`].
/// Unknown keys never fail a decode.
pub fn decode<T: Resource>(
    registry: &FragmentRegistry,
    payload: &serde_json::Value,
) -> Result<T, DecodeError> {
    let obj = payload
        .as_object()
        .ok_or(DecodeError::NotAnObject { resource: T::NAME })?;
    decode_object(registry, obj)
}

/// Decode a resource from an already-parsed wire container.
pub fn decode_object<T: Resource>(
    registry: &FragmentRegistry,
    obj: &Object,
) -> Result<T, DecodeError> {
    let mut resource = T::decode_fields(obj)?;
    for (key, raw) in obj {
        // Declared keys were consumed by the typed mapping above.
        if T::FIELD_KEYS.contains(&key.as_str()) {
            continue;
        }
        match registry.lookup(TypeId::of::<T>(), key) {
            Some(codec) => match codec.decode_wire(raw) {
                Some(fragment) => {
                    resource.fragments_mut().insert(key.clone(), fragment);
                }
                None => {
                    tracing::debug!(
                        resource = T::NAME,
                        key = %key,
                        "dropping fragment rejected by its registered decoder"
                    );
                }
            },
            None => {
                resource
                    .fragments_mut()
                    .insert(key.clone(), Fragment::Value(Value::from(raw)));
            }
        }
    }
    Ok(resource)
}

/// Encode a resource to its wire payload.
///
/// Declared fields that are set emit first, then every fragment: a
/// registered key goes through its typed encoder, falling back to the
/// fragment's own wire form when the encoder does not apply; unregistered
/// fragments emit generically. A fragment with no wire form is skipped
/// with a debug log.
pub fn encode<T: Resource>(registry: &FragmentRegistry, resource: &T) -> serde_json::Value {
    let mut obj = Object::new();
    resource.encode_fields(&mut obj);
    for (key, fragment) in resource.fragments().iter() {
        let encoded = match registry.lookup(TypeId::of::<T>(), key) {
            Some(codec) => codec.encode_wire(fragment).or_else(|| fragment.to_wire()),
            None => fragment.to_wire(),
        };
        match encoded {
            Some(wire) => {
                obj.insert(key.to_string(), wire);
            }
            None => {
                tracing::debug!(
                    resource = T::NAME,
                    key = %key,
                    "skipping fragment that failed to serialize"
                );
            }
        }
    }
    serde_json::Value::Object(obj)
}
