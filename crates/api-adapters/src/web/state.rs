//! Shared application state handed to every handler.

use std::sync::Arc;

use domains::{
    ContentRepository, PasswordHasher, Post, Review, Site, TokenIssuer, UserRepository,
};
use services::{AccountService, ContentService, ProfileGate, ProfileService};

use crate::metrics::Metrics;
use crate::paths::SETUP_PATH;

/// Storage handles the state is built from.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub reviews: Arc<dyn ContentRepository<Review>>,
    pub posts: Arc<dyn ContentRepository<Post>>,
}

#[derive(Clone)]
pub struct AppState {
    pub site: Site,
    pub reviews: Arc<ContentService<Review>>,
    pub posts: Arc<ContentService<Post>>,
    pub profiles: Arc<ProfileService>,
    pub accounts: Arc<AccountService>,
    pub gate: Arc<ProfileGate>,
    pub metrics: Arc<Metrics>,
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(
        site: Site,
        repos: Repositories,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        cookie_name: impl Into<Arc<str>>,
    ) -> Self {
        let policy = site.create_policy();
        Self {
            site,
            reviews: Arc::new(ContentService::new(repos.reviews, repos.users.clone(), policy)),
            posts: Arc::new(ContentService::new(repos.posts, repos.users.clone(), policy)),
            profiles: Arc::new(ProfileService::new(repos.users.clone(), site)),
            accounts: Arc::new(AccountService::new(repos.users, hasher, tokens)),
            gate: Arc::new(ProfileGate::new(site.completeness_rule(), SETUP_PATH)),
            metrics: Arc::new(Metrics::new()),
            cookie_name: cookie_name.into(),
        }
    }
}
