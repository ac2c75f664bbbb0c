//! # storage-adapters
//!
//! Persistence adapters for the domain repository ports.
//!
//! * [`memory`]: `dashmap`-backed repositories, always compiled. Used for
//!   local runs without a database and by the integration tests.
//! * `postgres`: `sqlx` repositories with embedded migrations, behind the
//!   `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::{MemoryContentRepository, MemoryUserRepository};

#[cfg(feature = "db-postgres")]
pub use postgres::{PgPostRepository, PgReviewRepository, PgUserRepository};
