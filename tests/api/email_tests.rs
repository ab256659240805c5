use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use mailpilot::models::ai_exchange::ErrorBody;
use mailpilot::models::email::{EmailRecord, EmailStatus};

use crate::support::{self, BrokenStore, CountingStore, FakeCompletion, Script};

const UNUSED_GRAPH: &str = "http://127.0.0.1:9";

#[actix_web::test]
async fn test_unauthenticated_calls_are_rejected_without_writes() {
    let store = CountingStore::new().await;
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        store.clone(),
        UNUSED_GRAPH
    ));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/emails").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/emails")
        .set_json(json!({"subject": "Hi", "content": "Body", "from": "me@example.com", "to": [], "cc": [], "bcc": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.creates(), 0);
}

#[actix_web::test]
async fn test_created_email_is_listed_first() {
    let store = CountingStore::new().await;
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        store.clone(),
        UNUSED_GRAPH
    ));
    let cookie = login!(app, "user=alice");

    for subject in ["Older", "Newest"] {
        let req = test::TestRequest::post()
            .uri("/api/emails")
            .cookie(cookie.clone())
            .set_json(json!({
                "subject": subject,
                "content": "Please find the report attached.",
                "from": "alice@contoso.com",
                "to": ["bob@contoso.com"],
                "cc": ["carol@contoso.com"],
                "bcc": []
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/emails")
        .cookie(cookie.clone())
        .set_json(json!({"subject": "Latest", "from": "alice@contoso.com", "to": ["dan@contoso.com"]}))
        .to_request();
    let created: EmailRecord = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created.user_id, "alice");
    assert_eq!(created.status, EmailStatus::Draft);
    assert!(created.cc.is_empty());

    let req = test::TestRequest::get().uri("/api/emails").cookie(cookie).to_request();
    let listed: Vec<EmailRecord> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0], created);
    assert_eq!(listed[1].subject, "Newest");
    assert_eq!(listed[2].subject, "Older");
    assert_eq!(store.creates(), 3);
}

#[actix_web::test]
async fn test_users_only_see_their_own_emails() {
    let store = CountingStore::new().await;
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        store.clone(),
        UNUSED_GRAPH
    ));
    let alice = login!(app, "user=alice");
    let bob = login!(app, "user=bob");

    let req = test::TestRequest::post()
        .uri("/api/emails")
        .cookie(alice.clone())
        .set_json(json!({"subject": "Alice only", "from": "alice@contoso.com"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/emails").cookie(bob).to_request();
    let listed: Vec<EmailRecord> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());

    let req = test::TestRequest::get().uri("/api/emails").cookie(alice).to_request();
    let listed: Vec<EmailRecord> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);
}

#[actix_web::test]
async fn test_storage_failure_is_500() {
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        Arc::new(BrokenStore),
        UNUSED_GRAPH
    ));
    let cookie = login!(app, "user=alice");

    let req = test::TestRequest::get().uri("/api/emails").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "Internal Server Error");

    let req = test::TestRequest::post()
        .uri("/api/emails")
        .cookie(cookie)
        .set_json(json!({"subject": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
