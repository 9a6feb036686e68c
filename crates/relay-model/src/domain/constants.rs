//! Common model-level constants.
//!
//! Well-known string keys shared by the cache and driver layers.

/// Separator used when joining the elements of a cache fingerprint input.
///
/// The canonical input for task `100`, version `3`, cache enabled and an empty pool is `100_3_1_[]`.
pub const PARAM_SEPARATOR: &str = "_";

/// Label key naming the provider a [`crate::JobSpec`] is meant for.
///
/// Purely informational: the driver never routes on it, but providers and logs may.
pub const LABEL_PROVIDER: &str = "provider";
