//! Huginn - cached retrieval of remote teaching datasets
//!
//! This crate fetches externally hosted datasets (Wikidata actor/movie
//! pairs, OpenStreetMap extracts, elevation grids, book metadata and
//! stored visualization assignments) over HTTP. Payloads are kept in a
//! bounded in-memory LRU cache keyed by a server-issued hash token, so an
//! unchanged dataset is downloaded at most once per session.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::DataSource;
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let source = DataSource::builder().build()?;
//!
//!     // One request per year; repeated years come from the cache.
//!     let pairs = source.wikidata_actor_movie(1955, 1956).await?;
//!     for pair in pairs.iter().take(5) {
//!         println!("{} : {}", pair.actor_name, pair.movie_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Hash-validated datasets
//!
//! ```rust,no_run
//! use huginn::{BoundingBox, DataSource, DatasetRequest};
//!
//! # async fn run() -> huginn::Result<()> {
//! let source = DataSource::builder().build()?;
//! let bbox = BoundingBox::new(35.2, -80.9, 35.4, -80.7);
//! let request = DatasetRequest::elevation(source.server_mode(), bbox, 0.02)?;
//! let json = source.fetch_dataset(&request).await?;
//! println!("{} bytes", json.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod decode;
pub mod error;
pub mod source;
pub mod telemetry;
pub mod transport;
pub mod version;

pub use config::{ServerMode, SourceConfig};
pub use decode::{
    ActorMovieDecoder, Color, ColorGrid, ColorGridDecoder, Decoder, Edge, Graph, GraphDecoder,
    MovieActor, RawText, Vertex,
};
pub use error::{HuginnError, Result};
pub use source::{
    BoundingBox, DataSource, DataSourceBuilder, DatasetKind, DatasetRequest, HashToken,
};
pub use transport::{HttpTransport, RetryConfig, RetryingTransport, Transport};
pub use version::{PKG_VERSION, version_string};
