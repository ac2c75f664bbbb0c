//! Shared fixtures for the integration tests: in-memory repositories,
//! ready-made users and drafts, and a router harness.

use std::sync::Arc;

use auth_adapters::{Argon2PasswordHasher, JwtTokenIssuer, TokenLifetimes};
use domains::{
    ItemCondition, Post, PostDraft, ProfileFields, Review, ReviewDraft, Site, TokenIssuer,
    TokenPurpose, User, UserRepository,
};
use services::ContentService;
use storage_adapters::{MemoryContentRepository, MemoryUserRepository};

pub const SECRET: &[u8] = b"integration-secret-integration-secret";
pub const COOKIE: &str = "sessionid";

/// How far along a fixture account is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Account {
    /// Just signed up: no profile, email unconfirmed.
    Fresh,
    /// Profile filled in, email unconfirmed.
    Unverified,
    /// Profile filled in and email confirmed.
    Ready,
}

pub struct Repos {
    pub users: Arc<MemoryUserRepository>,
    pub reviews: Arc<MemoryContentRepository<Review>>,
    pub posts: Arc<MemoryContentRepository<Post>>,
}

impl Repos {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            reviews: Arc::new(MemoryContentRepository::new()),
            posts: Arc::new(MemoryContentRepository::new()),
        }
    }

    pub fn review_service(&self, site: Site) -> ContentService<Review> {
        ContentService::new(self.reviews.clone(), self.users.clone(), site.create_policy())
    }

    pub fn post_service(&self, site: Site) -> ContentService<Post> {
        ContentService::new(self.posts.clone(), self.users.clone(), site.create_policy())
    }

    /// Stores an account in the given state. The nickname is the email's
    /// local part.
    pub async fn user(&self, email: &str, account: Account) -> User {
        let user = self
            .users
            .create(User::new(email.to_string(), "unused".to_string()))
            .await
            .unwrap();
        if account == Account::Fresh {
            return user;
        }
        let nickname = email.split('@').next().unwrap_or(email).to_string();
        let fields = ProfileFields {
            nickname: Some(nickname),
            kakao_id: Some(format!("kakao_{}", &user.id.simple().to_string()[..8])),
            ..user.profile_fields()
        };
        self.users.save_profile(user.id, fields).await.unwrap();
        if account == Account::Ready {
            self.users.mark_email_verified(user.id).await.unwrap();
        }
        self.users.get(user.id).await.unwrap().unwrap()
    }
}

impl Default for Repos {
    fn default() -> Self {
        Self::new()
    }
}

pub fn issuer() -> JwtTokenIssuer {
    JwtTokenIssuer::new(SECRET, TokenLifetimes::default())
}

pub fn review_draft(title: &str) -> ReviewDraft {
    ReviewDraft {
        title: title.to_string(),
        restaurant_name: "Menya".to_string(),
        restaurant_link: "https://place.map.kakao.com/1234".to_string(),
        rating: 4,
        image1: "review_pics/ramen.jpg".to_string(),
        image2: None,
        image3: None,
        content: "Rich broth, thin noodles.".to_string(),
    }
}

pub fn post_draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        item_price: 120_000,
        item_condition: ItemCondition::Good,
        item_details: "Lightly used, original box.".to_string(),
        image1: "post_pics/item.jpg".to_string(),
        image2: None,
        image3: None,
        is_sold: false,
    }
}

#[cfg(feature = "web-axum")]
pub use web::*;

#[cfg(feature = "web-axum")]
mod web {
    use super::*;

    use api_adapters::web::{self as app, AppState, Repositories};
    use axum::body::Body;
    use axum::http::{header, Method, Request, Response};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    /// The router wired to in-memory storage for one site variant.
    pub struct TestApp {
        pub site: Site,
        pub repos: Repos,
        pub tokens: Arc<JwtTokenIssuer>,
        pub router: Router,
    }

    impl TestApp {
        pub fn new(site: Site) -> Self {
            let repos = Repos::new();
            let tokens = Arc::new(issuer());
            let state = AppState::new(
                site,
                Repositories {
                    users: repos.users.clone(),
                    reviews: repos.reviews.clone(),
                    posts: repos.posts.clone(),
                },
                Arc::new(Argon2PasswordHasher::new()),
                tokens.clone(),
                COOKIE,
            );
            Self {
                site,
                repos,
                tokens,
                router: app::router(state),
            }
        }

        pub async fn user(&self, email: &str, account: Account) -> (User, String) {
            let user = self.repos.user(email, account).await;
            let token = self.token(&user);
            (user, token)
        }

        pub fn token(&self, user: &User) -> String {
            self.tokens.issue(user.id, TokenPurpose::Session).unwrap()
        }

        pub async fn send(&self, request: Request<Body>) -> Response<Body> {
            self.router.clone().oneshot(request).await.unwrap()
        }

        pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
            self.send(request(Method::GET, uri, token, None)).await
        }

        pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
            self.send(request(Method::POST, uri, token, Some(body))).await
        }
    }

    pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub fn location(response: &Response<Body>) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// The trailing id of a `/kind/{id}/` location.
    pub fn id_from_location(location: &str) -> uuid::Uuid {
        let id = location.trim_end_matches('/').rsplit('/').next().unwrap();
        id.parse().unwrap()
    }
}
