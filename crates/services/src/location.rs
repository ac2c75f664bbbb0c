use domains::ContentKind;
use uuid::Uuid;

/// Named redirect targets. Only the router knows their paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Index,
    ProfileSet,
    Detail(ContentKind, Uuid),
    Profile(Uuid),
    Login,
    ConfirmationRequired,
}
