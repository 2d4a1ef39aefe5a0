//! Decode errors for the resource codec.

use thiserror::Error;

/// Why decoding a resource failed.
///
/// All variants are fatal to the decode of that record: the caller gets
/// either a fully populated resource or exactly one of these. Fragment
/// failures are deliberately absent — malformed or unreadable fragment
/// data never breaks parsing of the declared fields, it is dropped with a
/// debug log.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not a JSON object.
    #[error("{resource}: payload is not a JSON object")]
    NotAnObject {
        /// Resource type being decoded.
        resource: &'static str,
    },

    /// A required declared field was absent (or explicit null).
    #[error("{resource}: missing required field `{field}` (wire key `{key}`)")]
    MissingField {
        /// Resource type being decoded.
        resource: &'static str,
        /// Field name on the resource.
        field: &'static str,
        /// Wire key the field maps to.
        key: &'static str,
    },

    /// A declared field was present but had the wrong shape.
    #[error("{resource}: field `{field}` (wire key `{key}`) has the wrong shape")]
    TypeMismatch {
        /// Resource type being decoded.
        resource: &'static str,
        /// Field name on the resource.
        field: &'static str,
        /// Wire key the field maps to.
        key: &'static str,
        /// The underlying shape error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_field() {
        let err = DecodeError::MissingField {
            resource: "sensor",
            field: "kind",
            key: "type",
        };
        assert_eq!(
            err.to_string(),
            "sensor: missing required field `kind` (wire key `type`)"
        );
    }

    #[test]
    fn type_mismatch_carries_the_source() {
        let source = serde_json::from_value::<String>(serde_json::json!(1)).unwrap_err();
        let err = DecodeError::TypeMismatch {
            resource: "sensor",
            field: "name",
            key: "name",
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
