//! URL layout. Services only name a [`Location`]; this is the one place that
//! knows which path it lives at.

use domains::ContentKind;
use services::Location;

pub const INDEX_PATH: &str = "/";
pub const SETUP_PATH: &str = "/set-profile/";
pub const LOGIN_PATH: &str = "/accounts/login/";
pub const CONFIRMATION_REQUIRED_PATH: &str = "/email-confirmation-required/";

/// Plural URL segment for a content kind.
pub fn segment(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Review => "reviews",
        ContentKind::Post => "posts",
    }
}

pub fn resolve(location: &Location) -> String {
    match location {
        Location::Index => INDEX_PATH.to_string(),
        Location::ProfileSet => SETUP_PATH.to_string(),
        Location::Detail(kind, id) => format!("/{}/{id}/", segment(*kind)),
        Location::Profile(id) => format!("/users/{id}/"),
        Location::Login => LOGIN_PATH.to_string(),
        Location::ConfirmationRequired => CONFIRMATION_REQUIRED_PATH.to_string(),
    }
}
