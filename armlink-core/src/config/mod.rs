//! Configuration types
//!
//! Board-agnostic configuration structures, optionally stored as postcard
//! binary data.

#[cfg(feature = "serde")]
pub mod store;
pub mod types;

#[cfg(feature = "serde")]
pub use store::MAX_CONFIG_SIZE;
pub use types::*;
