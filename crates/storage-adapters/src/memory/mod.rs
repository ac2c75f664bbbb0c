//! In-memory repositories.

mod content;
mod users;

pub use content::MemoryContentRepository;
pub use users::MemoryUserRepository;
