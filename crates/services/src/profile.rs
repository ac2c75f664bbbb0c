//! Profiles: the public profile page and self-only profile editing.

use std::sync::Arc;

use domains::validators::validate_no_special_characters;
use domains::{
    ContentItem, DomainError, ProfileField, ProfileFields, ProfileSummary, Result, Site, User,
    UserRepository,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::content::ContentService;
use crate::location::Location;

/// Submitted profile form. Fields the site does not expose are ignored.
/// Carries no id: the target is always the actor.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(max = 15), custom(function = "validate_no_special_characters"))]
    pub nickname: Option<String>,
    pub profile_pic: Option<String>,
    #[validate(length(max = 60))]
    pub intro: Option<String>,
    #[validate(length(max = 20))]
    pub kakao_id: Option<String>,
    #[validate(length(max = 40))]
    pub address: Option<String>,
}

impl ProfileForm {
    /// Trims every value, drops blanks and whatever `site` does not edit.
    fn cleaned(self, site: Site) -> Self {
        let keep = |field: ProfileField, value: Option<String>| {
            value
                .filter(|_| site.edits(field))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        ProfileForm {
            nickname: keep(ProfileField::Nickname, self.nickname),
            profile_pic: keep(ProfileField::ProfilePic, self.profile_pic),
            intro: keep(ProfileField::Intro, self.intro),
            kakao_id: keep(ProfileField::KakaoId, self.kakao_id),
            address: keep(ProfileField::Address, self.address),
        }
    }
}

/// Public profile page: the account plus its newest items.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView<T> {
    pub profile_user: ProfileSummary,
    pub recent: Vec<T>,
}

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    site: Site,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, site: Site) -> Self {
        Self { users, site }
    }

    pub async fn view_profile<T: ContentItem>(
        &self,
        id: Uuid,
        items: &ContentService<T>,
    ) -> Result<ProfileView<T>> {
        let user = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))?;
        let recent = items.recent_by_author(id).await?;
        Ok(ProfileView {
            profile_user: ProfileSummary::from(&user),
            recent,
        })
    }

    /// Current values for pre-filling the setup and edit forms.
    pub fn current(&self, actor: &User) -> ProfileFields {
        actor.profile_fields()
    }

    /// First-time profile setup; continues to the index.
    pub async fn set_profile(&self, actor: &User, form: ProfileForm) -> Result<(User, Location)> {
        let user = self.save(actor, form).await?;
        Ok((user, Location::Index))
    }

    /// Later edits; continues to the actor's own profile.
    pub async fn update_profile(&self, actor: &User, form: ProfileForm) -> Result<(User, Location)> {
        let user = self.save(actor, form).await?;
        let location = Location::Profile(user.id);
        Ok((user, location))
    }

    #[instrument(skip_all, fields(actor = %actor.id))]
    async fn save(&self, actor: &User, form: ProfileForm) -> Result<User> {
        let site = self.site;
        let form = form.cleaned(site);
        form.validate()?;

        let mut fields = actor.profile_fields();
        if site.edits(ProfileField::Nickname) {
            if site.requires_nickname() && form.nickname.is_none() {
                return Err(DomainError::field(
                    "nickname",
                    "required",
                    "this field is required",
                ));
            }
            fields.nickname = form.nickname;
        }
        if site.edits(ProfileField::ProfilePic) {
            // No new upload keeps the current picture.
            if let Some(pic) = form.profile_pic {
                fields.profile_pic = pic;
            }
        }
        if site.edits(ProfileField::Intro) {
            fields.intro = form.intro.unwrap_or_default();
        }
        if site.edits(ProfileField::KakaoId) {
            fields.kakao_id = form.kakao_id;
        }
        if site.edits(ProfileField::Address) {
            fields.address = form.address;
        }

        let user = self.users.save_profile(actor.id, fields).await?;
        info!("profile saved");
        Ok(user)
    }
}
