//! Site variants and the per-variant rules that differ between them.

use serde::{Deserialize, Serialize};

use crate::models::ContentKind;

/// Which of the two applications this deployment serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    /// Restaurant reviews.
    Reviews,
    /// Second-hand marketplace.
    Market,
}

/// When an account counts as having finished profile setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletenessRule {
    /// A nickname is required.
    Nickname,
    /// Any one of nickname, kakao id or address is enough.
    AnyContact,
}

/// Who may create content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePolicy {
    Authenticated,
    VerifiedEmail,
}

/// Profile columns a site's forms expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Nickname,
    ProfilePic,
    Intro,
    KakaoId,
    Address,
}

impl Site {
    pub fn content_kind(self) -> ContentKind {
        match self {
            Site::Reviews => ContentKind::Review,
            Site::Market => ContentKind::Post,
        }
    }

    pub fn completeness_rule(self) -> CompletenessRule {
        match self {
            Site::Reviews => CompletenessRule::Nickname,
            Site::Market => CompletenessRule::AnyContact,
        }
    }

    pub fn create_policy(self) -> CreatePolicy {
        match self {
            Site::Reviews => CreatePolicy::VerifiedEmail,
            Site::Market => CreatePolicy::Authenticated,
        }
    }

    pub fn profile_fields(self) -> &'static [ProfileField] {
        match self {
            Site::Reviews => &[ProfileField::Nickname, ProfileField::ProfilePic, ProfileField::Intro],
            Site::Market => &[
                ProfileField::ProfilePic,
                ProfileField::Nickname,
                ProfileField::KakaoId,
                ProfileField::Address,
            ],
        }
    }

    pub fn edits(self, field: ProfileField) -> bool {
        self.profile_fields().contains(&field)
    }

    /// The review site's profile form marks nickname as required.
    pub fn requires_nickname(self) -> bool {
        matches!(self.completeness_rule(), CompletenessRule::Nickname)
    }
}
