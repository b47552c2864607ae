//! Response decoders.
//!
//! Each decoder turns a fetched body into domain records or fails with
//! [`HuginnError::MalformedResponse`]. A decode either produces a complete
//! result or nothing.
//!
//! Expected JSON shapes are declared as serde structs next to each
//! decoder; [`parse_json`] is the single place where "field present and
//! correctly typed" is enforced and turned into a malformed-response error.

pub mod graph;
pub mod grid;
pub mod wikidata;

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use tracing::debug;

use crate::telemetry;
use crate::{HuginnError, Result};

pub use graph::{Edge, Graph, GraphDecoder, Vertex};
pub use grid::{Color, ColorGrid, ColorGridDecoder, GridEncoding, decode_grid, decode_pixels};
pub use wikidata::{ActorMovieDecoder, MovieActor, WIKIDATA_ENTITY_PREFIX, strip_first};

/// Pluggable payload decoder, invoked once the bytes are fetched.
pub trait Decoder {
    /// Decoded record type.
    type Output;

    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Decode a response body.
    fn decode(&self, body: &str) -> Result<Self::Output>;
}

/// Identity decoder: hands back the raw body.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawText;

impl Decoder for RawText {
    type Output = String;

    fn name(&self) -> &'static str {
        "raw"
    }

    fn decode(&self, body: &str) -> Result<String> {
        Ok(body.to_string())
    }
}

/// Parse `body` into the schema `T`.
///
/// Unparsable text, missing required fields and wrongly-typed fields all
/// become [`HuginnError::MalformedResponse`] mentioning `what`.
pub fn parse_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| fail(what, &e.to_string()))
}

/// Malformed-response error for decoder `what`, counted in
/// [`DECODE_FAILURES_TOTAL`](telemetry::DECODE_FAILURES_TOTAL).
///
/// Every decoder rejection goes through here.
pub(crate) fn fail(what: &str, msg: &str) -> HuginnError {
    metrics::counter!(telemetry::DECODE_FAILURES_TOTAL, "decoder" => what.to_owned())
        .increment(1);
    debug!(decoder = what, error = msg, "rejecting payload");
    HuginnError::malformed(format!("{what}: {msg}"))
}

/// Fail with a malformed-response error unless `cond` holds.
pub(crate) fn ensure(cond: bool, what: &str, msg: &str) -> Result<()> {
    if cond { Ok(()) } else { Err(fail(what, msg)) }
}

/// Optional string field that tolerates other JSON types by ignoring them.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Shape {
        #[allow(dead_code)]
        id: u32,
        #[serde(default, deserialize_with = "lenient_string")]
        label: Option<String>,
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let err = parse_json::<Shape>(r#"{"label":"x"}"#, "shape").unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("shape"));
    }

    #[test]
    fn wrong_type_is_malformed() {
        let err = parse_json::<Shape>(r#"{"id":"seven"}"#, "shape").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn lenient_string_ignores_other_types() {
        let shape: Shape = parse_json(r#"{"id":1,"label":42}"#, "shape").unwrap();
        assert_eq!(shape.label, None);
        let shape: Shape = parse_json(r#"{"id":1,"label":"ok"}"#, "shape").unwrap();
        assert_eq!(shape.label.as_deref(), Some("ok"));
        let shape: Shape = parse_json(r#"{"id":1}"#, "shape").unwrap();
        assert_eq!(shape.label, None);
    }

    #[test]
    fn raw_text_passes_through() {
        assert_eq!(RawText.decode("{}").unwrap(), "{}");
    }
}
