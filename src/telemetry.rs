//! Telemetry metric name constants.
//!
//! Centralised metric names for huginn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `kind`: dataset kind (e.g. "elevation", "wikidata")
//! - `status`: outcome: "ok" or "error"
//! - `decoder`: decoder name (e.g. "wikidata", "color_grid")

/// Total cache hits in the document cache.
///
/// Labels: `kind`.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total cache misses in the document cache.
///
/// Labels: `kind`.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Cache failures absorbed as soft errors.
///
/// Labels: `operation` ("read" | "write").
pub const CACHE_ERRORS_TOTAL: &str = "huginn_cache_errors_total";

/// Total requests sent through the HTTP transport.
///
/// Labels: `status` ("ok" | "error").
pub const TRANSPORT_REQUESTS_TOTAL: &str = "huginn_transport_requests_total";

/// Total retry attempts (not counting the initial request).
pub const RETRIES_TOTAL: &str = "huginn_retries_total";

/// Payloads rejected by a decoder.
///
/// Labels: `decoder`.
pub const DECODE_FAILURES_TOTAL: &str = "huginn_decode_failures_total";
