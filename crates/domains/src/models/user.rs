use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::site::CompletenessRule;

/// Picture assigned to accounts that never uploaded one.
pub const DEFAULT_PROFILE_PIC: &str = "default_profile_pic.jpg";

/// An account. Doubles as the request actor once a session resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified: bool,
    pub nickname: Option<String>,
    pub profile_pic: String,
    pub intro: String,
    pub kakao_id: Option<String>,
    pub address: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// A fresh account with an empty profile.
    pub fn new(email: String, password_hash: String) -> Self {
        User {
            id: Uuid::now_v7(),
            email,
            password_hash,
            email_verified: false,
            nickname: None,
            profile_pic: DEFAULT_PROFILE_PIC.to_string(),
            intro: String::new(),
            kakao_id: None,
            address: None,
            date_joined: Utc::now(),
        }
    }

    pub fn is_profile_complete(&self, rule: CompletenessRule) -> bool {
        match rule {
            CompletenessRule::Nickname => self.nickname.is_some(),
            CompletenessRule::AnyContact => {
                self.nickname.is_some() || self.kakao_id.is_some() || self.address.is_some()
            }
        }
    }

    /// Current editable profile, used as the base for partial forms.
    pub fn profile_fields(&self) -> ProfileFields {
        ProfileFields {
            nickname: self.nickname.clone(),
            profile_pic: self.profile_pic.clone(),
            intro: self.intro.clone(),
            kakao_id: self.kakao_id.clone(),
            address: self.address.clone(),
        }
    }

    pub fn apply_profile(&mut self, fields: ProfileFields) {
        self.nickname = fields.nickname;
        self.profile_pic = fields.profile_pic;
        self.intro = fields.intro;
        self.kakao_id = fields.kakao_id;
        self.address = fields.address;
    }
}

/// Full replacement of the editable profile columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub nickname: Option<String>,
    pub profile_pic: String,
    pub intro: String,
    pub kakao_id: Option<String>,
    pub address: Option<String>,
}

/// Public view of an account; never carries the email or password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub nickname: Option<String>,
    pub profile_pic: String,
    pub intro: String,
    pub kakao_id: Option<String>,
    pub address: Option<String>,
}

impl From<&User> for ProfileSummary {
    fn from(user: &User) -> Self {
        ProfileSummary {
            id: user.id,
            nickname: user.nickname.clone(),
            profile_pic: user.profile_pic.clone(),
            intro: user.intro.clone(),
            kakao_id: user.kakao_id.clone(),
            address: user.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_rule_ignores_contact_fields() {
        let mut user = User::new("a@example.com".into(), "hash".into());
        user.kakao_id = Some("kakao".into());
        assert!(!user.is_profile_complete(CompletenessRule::Nickname));
        assert!(user.is_profile_complete(CompletenessRule::AnyContact));

        user.nickname = Some("codeit".into());
        assert!(user.is_profile_complete(CompletenessRule::Nickname));
    }

    #[test]
    fn any_contact_rule_needs_at_least_one_field() {
        let mut user = User::new("b@example.com".into(), "hash".into());
        assert!(!user.is_profile_complete(CompletenessRule::AnyContact));
        user.address = Some("Seoul".into());
        assert!(user.is_profile_complete(CompletenessRule::AnyContact));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::new("c@example.com".into(), "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
