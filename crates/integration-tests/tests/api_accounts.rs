//! Sign-up, login, cookies, email confirmation and password change.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use domains::{Site, TokenIssuer, TokenPurpose, UserRepository};
use integration_tests::{body_json, location, request, Account, TestApp, COOKIE};
use serde_json::json;

/// The `name=value` pair of the session cookie a response sets.
fn session_cookie(response: &axum::http::Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{COOKIE}=")))
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string()
}

fn with_cookie(method: Method, uri: &str, cookie: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let mut request = request(method, uri, None, body);
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

async fn signup(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .post(
            "/accounts/signup/",
            None,
            json!({ "email": email, "password1": password, "password2": password }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    session_cookie(&response)
}

#[tokio::test]
async fn signup_signs_in_and_the_gate_asks_for_a_profile() {
    let app = TestApp::new(Site::Reviews);
    let cookie = signup(&app, "New@Example.com", "long-enough").await;

    let user = app
        .repos
        .users
        .find_by_email("new@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!user.email_verified);
    assert!(user.password_hash.starts_with("$argon2"));

    let response = app.send(with_cookie(Method::GET, "/", &cookie, None)).await;
    assert_eq!(location(&response), "/set-profile/");
}

#[tokio::test]
async fn signup_validation() {
    let app = TestApp::new(Site::Reviews);
    signup(&app, "taken@example.com", "long-enough").await;

    let cases = [
        (json!({ "email": "taken@example.com", "password1": "long-enough", "password2": "long-enough" }), "email"),
        (json!({ "email": "not-an-email", "password1": "long-enough", "password2": "long-enough" }), "email"),
        (json!({ "email": "a@example.com", "password1": "short", "password2": "short" }), "password1"),
        (json!({ "email": "b@example.com", "password1": "long-enough", "password2": "different" }), "password2"),
    ];
    for (body, field) in cases {
        let response = app.post("/accounts/signup/", None, body).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{field}");
        let errors = body_json(response).await;
        assert!(errors["error"]["fields"][field].is_array(), "{field}");
    }
}

#[tokio::test]
async fn login_and_logout() {
    let app = TestApp::new(Site::Market);
    signup(&app, "seller@example.com", "long-enough").await;

    let response = app
        .post(
            "/accounts/login/",
            None,
            json!({ "email": "seller@example.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post(
            "/accounts/login/",
            None,
            json!({ "email": " SELLER@example.com", "password": "long-enough" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response);

    let response = app
        .send(with_cookie(Method::POST, "/set-profile/", &cookie, Some(json!({ "kakao_id": "seller_k" }))))
        .await;
    assert_eq!(location(&response), "/");

    let response = app
        .send(with_cookie(Method::POST, "/accounts/logout/", &cookie, None))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cleared.starts_with(&format!("{COOKIE}=;")));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn garbage_session_tokens_mean_anonymous() {
    let app = TestApp::new(Site::Reviews);
    let response = app.get("/set-profile/", Some("not-a-token")).await;
    assert_eq!(location(&response), "/accounts/login/");
}

#[tokio::test]
async fn confirmation_key_verifies_the_email() {
    let app = TestApp::new(Site::Reviews);
    let (user, token) = app.user("pending@example.com", Account::Unverified).await;
    let key = app
        .tokens
        .issue(user.id, TokenPurpose::EmailConfirmation)
        .unwrap();

    // A session token is not a confirmation key.
    let response = app
        .get(&format!("/accounts/confirm-email/{token}/"), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .get(&format!("/accounts/confirm-email/{key}/"), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let user = app.repos.users.get(user.id).await.unwrap().unwrap();
    assert!(user.email_verified);

    let notice = app.get("/email-confirmation-required/", Some(&token)).await;
    assert_eq!(notice.status(), StatusCode::OK);
}

#[tokio::test]
async fn change_password() {
    let app = TestApp::new(Site::Reviews);
    let cookie = signup(&app, "writer@example.com", "first-password").await;
    app.send(with_cookie(
        Method::POST,
        "/set-profile/",
        &cookie,
        Some(json!({ "nickname": "writer" })),
    ))
    .await;
    let user = app
        .repos
        .users
        .find_by_email("writer@example.com")
        .await
        .unwrap()
        .unwrap();

    let wrong_old = json!({
        "old_password": "not-it",
        "new_password1": "second-password",
        "new_password2": "second-password",
    });
    let response = app
        .send(with_cookie(Method::POST, "/password/change/", &cookie, Some(wrong_old)))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["error"]["fields"]["old_password"].is_array());

    let ok = json!({
        "old_password": "first-password",
        "new_password1": "second-password",
        "new_password2": "second-password",
    });
    let response = app
        .send(with_cookie(Method::POST, "/password/change/", &cookie, Some(ok)))
        .await;
    assert_eq!(location(&response), format!("/users/{}/", user.id));

    let response = app
        .post(
            "/accounts/login/",
            None,
            json!({ "email": "writer@example.com", "password": "second-password" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
