//! The measurement record.

use serde::{Deserialize, Serialize};
use tether_core::{
    DecodeError, Fragments, Object, Resource, opt_field, put_field, put_opt_field, req_field,
};

/// Reference to the asset a measurement was taken on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Identifier of the source asset.
    pub id: String,
}

/// One measurement: a timestamped set of readings attached to an asset.
///
/// Kind and time are required on the wire; the readings themselves are
/// fragments (`temperature`, `battery`, whatever the device reports).
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Platform-assigned identifier.
    pub id: Option<String>,
    /// Measurement kind (wire key `type`). Required.
    pub kind: String,
    /// Timestamp, ISO-8601. Required.
    pub time: String,
    /// The asset this measurement belongs to.
    pub source: Option<Source>,
    /// Reading fragments.
    pub fragments: Fragments,
}

impl Measurement {
    /// A measurement of the given kind at the given time.
    #[must_use]
    pub fn new(kind: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            time: time.into(),
            source: None,
            fragments: Fragments::new(),
        }
    }
}

impl Resource for Measurement {
    const NAME: &'static str = "measurement";
    const FIELD_KEYS: &'static [&'static str] = &["id", "type", "time", "source"];

    fn decode_fields(obj: &Object) -> Result<Self, DecodeError> {
        Ok(Self {
            id: opt_field(obj, Self::NAME, "id", "id")?,
            kind: req_field(obj, Self::NAME, "kind", "type")?,
            time: req_field(obj, Self::NAME, "time", "time")?,
            source: opt_field(obj, Self::NAME, "source", "source")?,
            fragments: Fragments::new(),
        })
    }

    fn encode_fields(&self, obj: &mut Object) {
        put_opt_field(obj, "id", &self.id);
        put_field(obj, "type", &self.kind);
        put_field(obj, "time", &self.time);
        put_opt_field(obj, "source", &self.source);
    }

    fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    fn fragments_mut(&mut self) -> &mut Fragments {
        &mut self.fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::{FragmentRegistry, Value, decode, encode};

    #[test]
    fn round_trips_with_reading_fragments() {
        let registry = FragmentRegistry::new();
        let mut measurement = Measurement::new("temperature", "2026-05-01T09:00:00Z");
        measurement.source = Some(Source { id: "42".into() });
        measurement.fragments.set(
            "temperature",
            Value::from(json!({"value": 21.5, "unit": "C"})),
        );

        let wire = encode(&registry, &measurement);
        assert_eq!(
            wire,
            json!({
                "type": "temperature",
                "time": "2026-05-01T09:00:00Z",
                "source": {"id": "42"},
                "temperature": {"value": 21.5, "unit": "C"}
            })
        );
        let back: Measurement = decode(&registry, &wire).unwrap();
        assert_eq!(back, measurement);
    }

    #[test]
    fn missing_time_is_fatal() {
        let registry = FragmentRegistry::new();
        let err = decode::<Measurement>(&registry, &json!({"type": "t"})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingField {
                resource: "measurement",
                field: "time",
                key: "time"
            }
        ));
    }

    #[test]
    fn malformed_source_is_fatal() {
        let registry = FragmentRegistry::new();
        let wire = json!({"type": "t", "time": "now", "source": "not-an-object"});
        let err = decode::<Measurement>(&registry, &wire).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { field: "source", .. }));
    }
}
