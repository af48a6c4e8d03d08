//! Provider-facing data (environments, endpoint descriptors, error bodies).
//!
//! `environment` selects the Daraja deployment a client talks to, `endpoint` holds the immutable
//! path/method/credential descriptor for every API the crate calls, and `fault` models the error
//! body Daraja attaches to rejected requests.

pub mod endpoint;
pub mod environment;
pub mod fault;

pub use endpoint::*;
pub use environment::*;
pub use fault::*;
