//! Remote REST API: envelope format, errors and the HTTP client.

#[cfg(feature = "server")]
pub mod client;
pub mod envelope;
pub mod errors;
#[cfg(all(test, feature = "server"))]
pub mod mock;

/// Versioned prefix of every remote endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Page size used when loading reference options for select inputs.
pub const OPTIONS_PER_PAGE: u32 = 999;
