use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{DomainError, ProfileFields, Result, User, UserRepository};
use uuid::Uuid;

fn duplicate_nickname() -> DomainError {
    DomainError::field("nickname", "unique", "this nickname is already in use")
}

fn duplicate_email() -> DomainError {
    DomainError::field(
        "email",
        "unique",
        "a user is already registered with this email address",
    )
}

/// Account repository with unique indexes on email and nickname.
///
/// Lock order is always `users` before an index map.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
    nicknames: DashMap<String, Uuid>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `nickname` at `id`, failing if another account holds it.
    fn claim_nickname(&self, nickname: &str, id: Uuid) -> Result<()> {
        match self.nicknames.entry(nickname.to_string()) {
            Entry::Occupied(owner) if *owner.get() != id => Err(duplicate_nickname()),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: User) -> Result<User> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(duplicate_email()),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        if let Some(nickname) = &user.nickname {
            if let Err(e) = self.claim_nickname(nickname, user.id) {
                self.emails.remove(&user.email);
                return Err(e);
            }
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(id) = self.emails.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.get(id).await
    }

    async fn save_profile(&self, id: Uuid, fields: ProfileFields) -> Result<User> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("user", id))?;

        if let Some(nickname) = &fields.nickname {
            self.claim_nickname(nickname, id)?;
        }
        if let Some(old) = &user.nickname {
            if fields.nickname.as_ref() != Some(old) {
                self.nicknames.remove_if(old, |_, owner| *owner == id);
            }
        }

        user.apply_profile(fields);
        Ok(user.value().clone())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: String) -> Result<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("user", id))?;
        user.password_hash = password_hash;
        Ok(())
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("user", id))?;
        user.email_verified = true;
        Ok(())
    }
}
