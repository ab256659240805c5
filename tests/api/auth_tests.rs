use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use mailpilot::routes::SESSION_COOKIE_NAME;

use crate::support::{self, CountingStore, FakeCompletion, Script};

const UNUSED_GRAPH: &str = "http://127.0.0.1:9";

#[actix_web::test]
async fn test_session_endpoint_reports_signed_in_user() {
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        CountingStore::new().await,
        UNUSED_GRAPH
    ));

    let req = test::TestRequest::get().uri("/api/auth/session").to_request();
    let anonymous: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(anonymous, serde_json::json!({}));

    let cookie = login!(app, "user=alice&token=secret-token");
    let req = test::TestRequest::get().uri("/api/auth/session").cookie(cookie).to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["user"]["id"], "alice");
    assert!(session["expires"].is_string());
    assert!(!session.to_string().contains("secret-token"));
}

#[actix_web::test]
async fn test_signin_redirects_to_azure_with_state_cookie() {
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        CountingStore::new().await,
        UNUSED_GRAPH
    ));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/auth/signin").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp.headers().get("location").unwrap().to_str().unwrap().to_string();
    assert!(location.starts_with("https://login.microsoftonline.com/contoso/oauth2/v2.0/authorize"));
    assert!(resp.response().cookies().any(|c| c.name() == SESSION_COOKIE_NAME));
}

#[actix_web::test]
async fn test_callback_with_unknown_state_is_rejected() {
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        CountingStore::new().await,
        UNUSED_GRAPH
    ));

    let req = test::TestRequest::get()
        .uri("/api/auth/callback/azure-ad?code=abc&state=forged")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/auth/callback/azure-ad?error=access_denied&error_description=user+cancelled")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_signout_clears_session_cookie() {
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        CountingStore::new().await,
        UNUSED_GRAPH
    ));
    let cookie = login!(app, "user=alice");

    let req = test::TestRequest::post().uri("/api/auth/signout").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .expect("removal cookie")
        .into_owned();
    assert!(cleared.value().is_empty());

    let req = test::TestRequest::get().uri("/api/emails").cookie(cleared).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_session_cookie_does_not_expose_access_token() {
    let app = test_app!(support::state(
        FakeCompletion::new(Script::Reply("x")),
        CountingStore::new().await,
        UNUSED_GRAPH
    ));

    let cookie = login!(app, "user=alice&token=graph-bearer-7f3a");
    assert!(!cookie.value().contains("graph-bearer-7f3a"));
    assert!(!cookie.value().contains("alice"));

    let req = test::TestRequest::get().uri("/api/auth/session").cookie(cookie).to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["user"]["id"], "alice");
}
