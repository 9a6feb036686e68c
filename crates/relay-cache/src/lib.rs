//! Cache fingerprinting for workflow tasks.
//!
//! Two pure building blocks:
//! - [`resolve_input_variables`] narrows the variables visible to a task down to the ones that influence its result and renders them canonically;
//! - [`generate_cache_key`] digests a task identity plus that rendering into a fixed-width hex key.
//!
//! Nothing here performs I/O or depends on time, randomness or process state, so every function is safe to call concurrently.
mod error;
pub use error::CacheError;

mod fingerprint;
pub use fingerprint::{
    CacheKey, DigestAlgorithm, Fingerprinter, TAG_SEPARATOR, canonical_input, generate_cache_key,
    generate_tag_cache_key, revert_cache_key,
};

mod placeholder;
pub use placeholder::{placeholder_names, render_placeholders};

mod resolver;
pub use resolver::{resolve_from_task_params, resolve_input_variables};
