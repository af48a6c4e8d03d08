//! Client credentials, bearer tokens, and the single-flight credential cache.

pub mod cache;
pub mod credentials;
pub mod secret;
pub mod token;

pub use cache::*;
pub use credentials::*;
pub use secret::*;
pub use token::*;
