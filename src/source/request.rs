//! Dataset addressing: which URLs serve a dataset and how it is keyed.

use std::fmt;

use reqwest::Url;

use crate::config::ServerMode;
use crate::{HuginnError, Result};

/// Kind of remote dataset, which decides how its cache token is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Osm,
    Amenity,
    Elevation,
    /// No hash endpoint: the hash URL is itself the cache key.
    Gutenberg,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Osm => "osm",
            DatasetKind::Amenity => "amenity",
            DatasetKind::Elevation => "elevation",
            DatasetKind::Gutenberg => "gutenberg",
        }
    }

    /// Whether the token must be requested from the server's hash endpoint.
    pub fn uses_remote_hash(&self) -> bool {
        !matches!(self, DatasetKind::Gutenberg)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("minLon", self.min_lon.to_string()),
            ("minLat", self.min_lat.to_string()),
            ("maxLon", self.max_lon.to_string()),
            ("maxLat", self.max_lat.to_string()),
        ]
    }
}

/// A remote dataset: where to fetch it and where to ask for its hash token.
///
/// Constructed per call and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRequest {
    pub data_url: String,
    /// Hash endpoint, or the cache key itself for kinds without one.
    pub hash_url: String,
    pub kind: DatasetKind,
}

impl DatasetRequest {
    pub fn new(data_url: impl Into<String>, hash_url: impl Into<String>, kind: DatasetKind) -> Self {
        Self {
            data_url: data_url.into(),
            hash_url: hash_url.into(),
            kind,
        }
    }

    /// Elevation grid over `bbox` sampled every `resolution` degrees.
    pub fn elevation(mode: ServerMode, bbox: BoundingBox, resolution: f64) -> Result<Self> {
        let mut params = bbox.query_pairs().to_vec();
        params.push(("resX", resolution.to_string()));
        params.push(("resY", resolution.to_string()));
        Self::with_hash_endpoint(
            mode.elevation_base_url(),
            "elevation",
            &params,
            DatasetKind::Elevation,
        )
    }

    /// OpenStreetMap road network over `bbox` at a detail `level`
    /// (e.g. `"default"`, `"motorway"`).
    pub fn osm(mode: ServerMode, bbox: BoundingBox, level: &str) -> Result<Self> {
        let mut params = bbox.query_pairs().to_vec();
        params.push(("level", level.to_string()));
        Self::with_hash_endpoint(mode.osm_base_url(), "coords", &params, DatasetKind::Osm)
    }

    /// Points of interest of type `amenity` inside `bbox`.
    pub fn amenity(mode: ServerMode, bbox: BoundingBox, amenity: &str) -> Result<Self> {
        let mut params = bbox.query_pairs().to_vec();
        params.push(("amenity", amenity.to_string()));
        Self::with_hash_endpoint(mode.osm_base_url(), "amenity", &params, DatasetKind::Amenity)
    }

    /// Metadata for one Project Gutenberg book.
    pub fn gutenberg_book(mode: ServerMode, id: u32) -> Result<Self> {
        let data_url = endpoint(mode.gutenberg_base_url(), "book", &[("id", id.to_string())])?;
        let data_url = data_url.to_string();
        Ok(Self::new(data_url.clone(), data_url, DatasetKind::Gutenberg))
    }

    fn with_hash_endpoint(
        base: &str,
        path: &str,
        params: &[(&str, String)],
        kind: DatasetKind,
    ) -> Result<Self> {
        let data_url = endpoint(base, path, params)?;
        let mut hash_url = endpoint(base, "hash", &[])?;
        hash_url.set_query(data_url.query());
        Ok(Self::new(data_url.to_string(), hash_url.to_string(), kind))
    }
}

fn endpoint(base: &str, path: &str, params: &[(&str, String)]) -> Result<Url> {
    let url = format!("{base}{path}");
    if params.is_empty() {
        return Url::parse(&url)
            .map_err(|e| HuginnError::Configuration(format!("invalid URL {url:?}: {e}")));
    }
    Url::parse_with_params(&url, params)
        .map_err(|e| HuginnError::Configuration(format!("invalid URL {url:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::new(35.2, -80.9, 35.4, -80.7)
    }

    #[test]
    fn elevation_urls_share_query() {
        let req = DatasetRequest::elevation(ServerMode::Live, bbox(), 0.02).unwrap();
        assert_eq!(
            req.data_url,
            "http://bridges-data-server-elevation.bridgesuncc.org/elevation?\
             minLon=-80.9&minLat=35.2&maxLon=-80.7&maxLat=35.4&resX=0.02&resY=0.02"
        );
        assert_eq!(
            req.hash_url,
            "http://bridges-data-server-elevation.bridgesuncc.org/hash?\
             minLon=-80.9&minLat=35.2&maxLon=-80.7&maxLat=35.4&resX=0.02&resY=0.02"
        );
        assert_eq!(req.kind, DatasetKind::Elevation);
    }

    #[test]
    fn osm_uses_level() {
        let req = DatasetRequest::osm(ServerMode::Local, bbox(), "motorway").unwrap();
        assert!(req.data_url.starts_with("http://localhost:3000/coords?"));
        assert!(req.data_url.ends_with("&level=motorway"));
        assert!(req.hash_url.starts_with("http://localhost:3000/hash?"));
    }

    #[test]
    fn amenity_value_is_encoded() {
        let req = DatasetRequest::amenity(ServerMode::Live, bbox(), "fast food").unwrap();
        assert!(req.data_url.contains("/amenity?"));
        assert!(req.data_url.ends_with("&amenity=fast+food"));
        assert_eq!(req.kind, DatasetKind::Amenity);
    }

    #[test]
    fn gutenberg_hash_is_data_url() {
        let req = DatasetRequest::gutenberg_book(ServerMode::Testing, 1342).unwrap();
        assert_eq!(
            req.data_url,
            "http://bridges-data-server-gutenberg-t.bridgesuncc.org/book?id=1342"
        );
        assert_eq!(req.hash_url, req.data_url);
        assert!(!req.kind.uses_remote_hash());
    }

    #[test]
    fn only_gutenberg_skips_hash_endpoint() {
        assert!(DatasetKind::Osm.uses_remote_hash());
        assert!(DatasetKind::Amenity.uses_remote_hash());
        assert!(DatasetKind::Elevation.uses_remote_hash());
        assert!(!DatasetKind::Gutenberg.uses_remote_hash());
    }
}
