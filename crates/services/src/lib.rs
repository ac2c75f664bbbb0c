//! review-market/crates/services/src/lib.rs
//!
//! Use-case orchestration on top of the domain ports: the profile
//! completeness gate, ownership checks, content CRUD, profiles and accounts.
//! Services never know about HTTP; they return named [`Location`]s that the
//! web layer resolves to paths.

pub mod access;
pub mod accounts;
pub mod content;
pub mod location;
pub mod profile;
pub mod profile_gate;

pub use accounts::{AccountService, LoginForm, PasswordChangeForm, SignedIn, SignupForm};
pub use content::{AuthorListing, ContentService};
pub use location::Location;
pub use profile::{ProfileForm, ProfileService, ProfileView};
pub use profile_gate::{GateDecision, ProfileGate};
