//! Review CRUD over HTTP on the reviews site.

use axum::http::StatusCode;
use domains::{ContentRepository, Site};
use integration_tests::{body_json, id_from_location, location, review_draft, Account, TestApp};
use serde_json::json;
use uuid::Uuid;

fn draft(title: &str) -> serde_json::Value {
    serde_json::to_value(review_draft(title)).unwrap()
}

async fn create(app: &TestApp, token: &str, title: &str) -> Uuid {
    let response = app.post("/reviews/new/", Some(token), draft(title)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    id_from_location(location(&response))
}

#[tokio::test]
async fn create_redirects_to_detail_and_ignores_a_claimed_author() {
    let app = TestApp::new(Site::Reviews);
    let (author, token) = app.user("writer@example.com", Account::Ready).await;

    let mut body = draft("Dumplings");
    body["author_id"] = json!(Uuid::now_v7());
    let response = app.post("/reviews/new/", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let id = id_from_location(location(&response));
    assert_eq!(location(&response), format!("/reviews/{id}/"));

    let detail = body_json(app.get(&format!("/reviews/{id}/"), None).await).await;
    assert_eq!(detail["author_id"], json!(author.id));
    assert_eq!(detail["title"], "Dumplings");
    assert_eq!(detail["rating"], 4);
}

#[tokio::test]
async fn anonymous_create_goes_to_login() {
    let app = TestApp::new(Site::Reviews);
    let response = app.post("/reviews/new/", None, draft("Nope")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/");

    let notice = app.get(&location(&response), None).await;
    assert_eq!(notice.status(), StatusCode::OK);
    assert!(body_json(notice).await["message"].is_string());
}

#[tokio::test]
async fn unverified_create_goes_to_confirmation_notice() {
    let app = TestApp::new(Site::Reviews);
    let (_, token) = app.user("pending@example.com", Account::Unverified).await;
    let response = app.post("/reviews/new/", Some(&token), draft("Nope")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/email-confirmation-required/");
    assert_eq!(app.repos.reviews.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_reviews_report_field_errors() {
    let app = TestApp::new(Site::Reviews);
    let (_, token) = app.user("writer@example.com", Account::Ready).await;
    let mut body = draft("Bad");
    body["rating"] = json!(6);
    body["title"] = json!("   ");

    let response = app.post("/reviews/new/", Some(&token), body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"]["fields"]["rating"].is_array());
    assert!(body["error"]["fields"]["title"].is_array());
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let app = TestApp::new(Site::Reviews);
    let (_, token) = app.user("writer@example.com", Account::Ready).await;
    let response = app
        .post("/reviews/new/", Some(&token), json!({ "title": "missing everything" }))
        .await;
    assert!(response.status().is_client_error());
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn only_the_author_may_edit_or_delete() {
    let app = TestApp::new(Site::Reviews);
    let (_, author) = app.user("author@example.com", Account::Ready).await;
    let (_, intruder) = app.user("intruder@example.com", Account::Ready).await;
    let id = create(&app, &author, "Original").await;
    let detail = format!("/reviews/{id}/");
    let edit = format!("/reviews/{id}/edit/");
    let delete = format!("/reviews/{id}/delete/");

    for token in [Some(intruder.as_str()), None] {
        assert_eq!(app.get(&edit, token).await.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.get(&delete, token).await.status(), StatusCode::FORBIDDEN);
        let response = app.post(&edit, token, draft("Hijacked")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = app.post(&delete, token, json!({})).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
    let unchanged = body_json(app.get(&detail, None).await).await;
    assert_eq!(unchanged["title"], "Original");

    assert_eq!(app.get(&edit, Some(&author)).await.status(), StatusCode::OK);
    let response = app.post(&edit, Some(&author), draft("Revised")).await;
    assert_eq!(location(&response), detail);
    let revised = body_json(app.get(&detail, None).await).await;
    assert_eq!(revised["title"], "Revised");

    let response = app.post(&delete, Some(&author), json!({})).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(app.get(&detail, None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_paginates_newest_first() {
    let app = TestApp::new(Site::Reviews);
    let (_, token) = app.user("writer@example.com", Account::Ready).await;
    for n in 0..5 {
        create(&app, &token, &format!("Review {n}")).await;
    }

    let first = body_json(app.get("/", None).await).await;
    assert_eq!(first["items"].as_array().unwrap().len(), 4);
    assert_eq!(first["items"][0]["title"], "Review 4");
    assert_eq!(first["num_pages"], 2);

    let second = body_json(app.get("/?page=2", None).await).await;
    assert_eq!(second["items"].as_array().unwrap().len(), 1);
    assert_eq!(second["items"][0]["title"], "Review 0");

    assert_eq!(app.get("/?page=3", None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/?page=0", None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/?page=abc", None).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_reviews_are_not_found() {
    let app = TestApp::new(Site::Reviews);
    let response = app.get(&format!("/reviews/{}/", Uuid::now_v7()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let app = TestApp::new(Site::Reviews);
    let (_, token) = app.user("writer@example.com", Account::Ready).await;
    for path in [
        "/reviews/123/",
        "/reviews/123/edit/",
        "/reviews/123/delete/",
        "/users/abc/",
        "/users/abc/reviews/",
    ] {
        let response = app.get(path, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND", "{path}");
    }
    let response = app.post("/reviews/123/edit/", Some(&token), draft("Nope")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn posts_are_not_served_on_the_reviews_site() {
    let app = TestApp::new(Site::Reviews);
    let response = app.get(&format!("/posts/{}/", Uuid::now_v7()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
