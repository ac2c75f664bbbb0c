//! review-market/crates/domains/src/lib.rs
//!
//! Domain models, port traits and the shared error type for review-market.
//! Nothing in this crate performs I/O; adapters implement the ports.

pub mod error;
pub mod models;
pub mod pagination;
pub mod ports;
pub mod site;
pub mod validators;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use pagination::*;
pub use ports::*;
pub use site::*;
