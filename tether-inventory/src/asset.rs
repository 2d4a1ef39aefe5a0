//! The inventory asset record.

use tether_core::{
    DecodeError, Fragments, Object, Resource, opt_field, put_opt_field,
};

/// An inventory asset: a device, gateway or any other managed thing.
///
/// All declared fields are optional — a fresh asset starts empty and the
/// platform fills in identifiers and timestamps. Everything beyond the
/// declared fields lives in [`fragments`](Asset::fragments).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    /// Platform-assigned identifier.
    pub id: Option<String>,
    /// Human-readable name.
    pub name: Option<String>,
    /// Asset kind (wire key `type`).
    pub kind: Option<String>,
    /// Owning user or tenant.
    pub owner: Option<String>,
    /// Creation timestamp, ISO-8601 (wire key `creationTime`).
    pub creation_time: Option<String>,
    /// Last-update timestamp, ISO-8601 (wire key `lastUpdated`).
    pub last_updated: Option<String>,
    /// Custom fragments.
    pub fragments: Fragments,
}

impl Asset {
    /// An empty asset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty asset of the given kind.
    #[must_use]
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }
}

impl Resource for Asset {
    const NAME: &'static str = "asset";
    const FIELD_KEYS: &'static [&'static str] =
        &["id", "name", "type", "owner", "creationTime", "lastUpdated"];

    fn decode_fields(obj: &Object) -> Result<Self, DecodeError> {
        Ok(Self {
            id: opt_field(obj, Self::NAME, "id", "id")?,
            name: opt_field(obj, Self::NAME, "name", "name")?,
            kind: opt_field(obj, Self::NAME, "kind", "type")?,
            owner: opt_field(obj, Self::NAME, "owner", "owner")?,
            creation_time: opt_field(obj, Self::NAME, "creation_time", "creationTime")?,
            last_updated: opt_field(obj, Self::NAME, "last_updated", "lastUpdated")?,
            fragments: Fragments::new(),
        })
    }

    fn encode_fields(&self, obj: &mut Object) {
        put_opt_field(obj, "id", &self.id);
        put_opt_field(obj, "name", &self.name);
        put_opt_field(obj, "type", &self.kind);
        put_opt_field(obj, "owner", &self.owner);
        put_opt_field(obj, "creationTime", &self.creation_time);
        put_opt_field(obj, "lastUpdated", &self.last_updated);
    }

    fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    fn fragments_mut(&mut self) -> &mut Fragments {
        &mut self.fragments
    }
}
