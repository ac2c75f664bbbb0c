//! Accounts: sign-up, login, session resolution, email confirmation and
//! password change.

use std::sync::Arc;

use domains::{DomainError, PasswordHasher, Result, TokenIssuer, TokenPurpose, User, UserRepository};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::location::Location;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordChangeForm {
    pub old_password: String,
    #[validate(length(min = 8))]
    pub new_password1: String,
    pub new_password2: String,
}

/// A signed-in account and its session token.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    #[instrument(skip_all)]
    pub async fn signup(&self, mut form: SignupForm) -> Result<SignedIn> {
        form.email = normalize_email(&form.email);
        form.validate()?;
        if form.password1 != form.password2 {
            return Err(DomainError::field(
                "password2",
                "password_mismatch",
                "the two password fields didn't match",
            ));
        }
        if self.users.find_by_email(&form.email).await?.is_some() {
            return Err(DomainError::field(
                "email",
                "unique",
                "a user is already registered with this email address",
            ));
        }

        let password_hash = self.hasher.hash(&form.password1).await?;
        let user = self.users.create(User::new(form.email, password_hash)).await?;

        // Delivery is external; the key is what a confirmation mail would carry.
        let key = self.tokens.issue(user.id, TokenPurpose::EmailConfirmation)?;
        info!(user_id = %user.id, confirmation_key = %key, "email confirmation issued");

        let token = self.tokens.issue(user.id, TokenPurpose::Session)?;
        Ok(SignedIn { user, token })
    }

    #[instrument(skip_all)]
    pub async fn login(&self, form: LoginForm) -> Result<SignedIn> {
        let email = normalize_email(&form.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;
        if !self.hasher.verify(&form.password, &user.password_hash).await? {
            debug!(user_id = %user.id, "wrong password");
            return Err(DomainError::InvalidCredentials);
        }
        let token = self.tokens.issue(user.id, TokenPurpose::Session)?;
        info!(user_id = %user.id, "signed in");
        Ok(SignedIn { user, token })
    }

    /// Resolves a session token. Bad or expired tokens mean anonymous.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>> {
        match self.tokens.verify(token, TokenPurpose::Session) {
            Ok(id) => self.users.get(id).await,
            Err(DomainError::InvalidToken) => {
                debug!("ignoring invalid session token");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip_all)]
    pub async fn confirm_email(&self, key: &str) -> Result<Location> {
        let id = self.tokens.verify(key, TokenPurpose::EmailConfirmation)?;
        if self.users.get(id).await?.is_none() {
            return Err(DomainError::not_found("user", id));
        }
        self.users.mark_email_verified(id).await?;
        info!(user_id = %id, "email confirmed");
        Ok(Location::Index)
    }

    #[instrument(skip_all, fields(actor = %actor.id))]
    pub async fn change_password(&self, actor: &User, form: PasswordChangeForm) -> Result<Location> {
        form.validate()?;
        if !self.hasher.verify(&form.old_password, &actor.password_hash).await? {
            return Err(DomainError::field(
                "old_password",
                "password_incorrect",
                "your old password was entered incorrectly",
            ));
        }
        if form.new_password1 != form.new_password2 {
            return Err(DomainError::field(
                "new_password2",
                "password_mismatch",
                "the two password fields didn't match",
            ));
        }
        let password_hash = self.hasher.hash(&form.new_password1).await?;
        self.users.set_password_hash(actor.id, password_hash).await?;
        info!("password changed");
        Ok(Location::Profile(actor.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockPasswordHasher, MockTokenIssuer, MockUserRepository};
    use uuid::Uuid;

    fn service(
        users: MockUserRepository,
        hasher: MockPasswordHasher,
        tokens: MockTokenIssuer,
    ) -> AccountService {
        AccountService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
    }

    #[tokio::test]
    async fn signup_rejects_taken_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email.to_string() == "taken@example.com")
            .returning(|email| Ok(Some(User::new(email.to_string(), "h".into()))));
        users.expect_create().never();

        let form = SignupForm {
            email: " Taken@Example.com ".into(),
            password1: "password123".into(),
            password2: "password123".into(),
        };
        let err = service(users, MockPasswordHasher::new(), MockTokenIssuer::new())
            .signup(form)
            .await
            .unwrap_err();
        assert!(err.is_field_error("email"));
    }

    #[tokio::test]
    async fn signup_rejects_mismatched_passwords() {
        let form = SignupForm {
            email: "new@example.com".into(),
            password1: "password123".into(),
            password2: "password124".into(),
        };
        let err = service(
            MockUserRepository::new(),
            MockPasswordHasher::new(),
            MockTokenIssuer::new(),
        )
        .signup(form)
        .await
        .unwrap_err();
        assert!(err.is_field_error("password2"));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(User::new(email.to_string(), "stored".into()))));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|_, _| Ok(false));
        let mut tokens = MockTokenIssuer::new();
        tokens.expect_issue().never();

        let form = LoginForm {
            email: "me@example.com".into(),
            password: "nope".into(),
        };
        let err = service(users, hasher, tokens).login(form).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn invalid_session_token_is_anonymous() {
        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_verify()
            .returning(|_, _| Err(DomainError::InvalidToken));
        let mut users = MockUserRepository::new();
        users.expect_get().never();

        let user = service(users, MockPasswordHasher::new(), tokens)
            .authenticate("garbage")
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn confirm_email_marks_the_key_owner_verified() {
        let id = Uuid::now_v7();
        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_verify()
            .withf(|key, purpose| {
                key.to_string() == "key" && *purpose == TokenPurpose::EmailConfirmation
            })
            .returning(move |_, _| Ok(id));
        let mut users = MockUserRepository::new();
        users.expect_get().returning(move |_| {
            let mut user = User::new("me@example.com".into(), "h".into());
            user.id = id;
            Ok(Some(user))
        });
        users
            .expect_mark_email_verified()
            .withf(move |target| *target == id)
            .times(1)
            .returning(|_| Ok(()));

        let location = service(users, MockPasswordHasher::new(), tokens)
            .confirm_email("key")
            .await
            .unwrap();
        assert_eq!(location, Location::Index);
    }

    #[tokio::test]
    async fn change_password_returns_to_own_profile() {
        let me = User::new("me@example.com".into(), "old-hash".into());
        let my_id = me.id;
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|password, hash| {
            Ok(password.to_string() == "old-password" && hash.to_string() == "old-hash")
        });
        hasher
            .expect_hash()
            .returning(|_| Ok("new-hash".to_string()));
        let mut users = MockUserRepository::new();
        users
            .expect_set_password_hash()
            .withf(move |id, hash| *id == my_id && hash.as_str() == "new-hash")
            .times(1)
            .returning(|_, _| Ok(()));

        let form = PasswordChangeForm {
            old_password: "old-password".into(),
            new_password1: "new-password".into(),
            new_password2: "new-password".into(),
        };
        let location = service(users, hasher, MockTokenIssuer::new())
            .change_password(&me, form)
            .await
            .unwrap();
        assert_eq!(location, Location::Profile(my_id));
    }

    #[tokio::test]
    async fn change_password_checks_old_password() {
        let me = User::new("me@example.com".into(), "old-hash".into());
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|_, _| Ok(false));
        let mut users = MockUserRepository::new();
        users.expect_set_password_hash().never();

        let form = PasswordChangeForm {
            old_password: "guess".into(),
            new_password1: "new-password".into(),
            new_password2: "new-password".into(),
        };
        let err = service(users, hasher, MockTokenIssuer::new())
            .change_password(&me, form)
            .await
            .unwrap_err();
        assert!(err.is_field_error("old_password"));
    }
}
