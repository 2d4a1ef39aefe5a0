//! # tether-core — open document model for Tether platform resources
//!
//! Every Tether resource is an *open record*: a fixed set of declared,
//! strongly-typed fields plus an open-ended set of custom fragments —
//! server- or caller-defined wire keys of arbitrary shape. This crate is
//! the engine behind that model:
//!
//! | Piece | Type | What it does |
//! |-------|------|--------------|
//! | Dynamic value | [`Value`] | Schema-less JSON-compatible data |
//! | Fragment map | [`Fragments`], [`Fragment`] | Open part of each resource |
//! | Registry | [`FragmentRegistry`] | Typed handling for chosen fragment keys |
//! | Codec | [`Resource`], [`decode`], [`encode`] | One generic (de)serializer for every resource type |
//!
//! ## Decode semantics
//!
//! Declared fields decode through typed lookups; a missing required field
//! or wrong shape is fatal and surfaces as one structured [`DecodeError`].
//! Every other wire key lands in the fragment map — as the registered
//! concrete type when one applies, as a generic [`Value`] otherwise.
//! Unknown or malformed fragments never fail a decode: a fragment that
//! does not match its registered type is dropped (with a `tracing` debug
//! log) and the rest of the record parses normally.
//!
//! Re-encoding a decoded resource reproduces equivalent wire content, on
//! both the generic and the registered-type path.
//!
//! ## Concurrency
//!
//! Resources and fragment maps are plain values — not for concurrent
//! mutation. The [`FragmentRegistry`] is shared state: register at
//! start-up, look up concurrently from any number of in-flight decodes.

#![deny(missing_docs)]

pub mod error;
pub mod fragment;
pub mod registry;
pub mod resource;
pub mod value;

pub use error::DecodeError;
pub use fragment::{Fragment, Fragments, TypedFragment};
pub use registry::{FragmentCodec, FragmentRegistry};
pub use resource::{
    Object, Resource, decode, decode_object, encode, opt_field, put_field, put_opt_field,
    req_field,
};
pub use value::Value;
