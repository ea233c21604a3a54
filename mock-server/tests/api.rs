use axum::http::{self, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use mock_server::{app, Activity, Identity, IdentityId, PRIVATE_BASE};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn get_as(uri: &str, user: (&str, &str)) -> Request<String> {
    Request::builder()
        .uri(format!("{PRIVATE_BASE}{uri}"))
        .header(http::header::AUTHORIZATION, auth(user.0, user.1))
        .body(String::new())
        .unwrap()
}

fn post_as(uri: &str, user: (&str, &str), body: Option<&str>) -> Request<String> {
    let builder = Request::builder()
        .method("POST")
        .uri(format!("{PRIVATE_BASE}{uri}"))
        .header(http::header::AUTHORIZATION, auth(user.0, user.1))
        .header(http::header::CONTENT_TYPE, "application/json");
    builder.body(body.unwrap_or_default().to_string()).unwrap()
}

const DEMO: (&str, &str) = ("demo", "gtn");
const JOHN: (&str, &str) = ("john", "gtn");

// --- authentication ---

#[tokio::test]
async fn missing_credentials_return_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(format!("{PRIVATE_BASE}/identity/organization/demo/id/show.json"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_returns_401() {
    let resp = app()
        .oneshot(get_as("/identity/organization/demo/id/show.json", ("demo", "nope")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- identity ---

#[tokio::test]
async fn identity_id_then_identity() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(get_as("/identity/organization/demo/id/show.json", DEMO))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let IdentityId { id } = body_json(resp).await;

    let resp = app.oneshot(get_as(&format!("/identity/{id}.json"), DEMO)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let identity: Identity = body_json(resp).await;
    assert_eq!(identity.id, id);
    assert_eq!(identity.provider_id, "organization");
    assert_eq!(identity.remote_id, "demo");
    assert_eq!(identity.profile.full_name, "Demo gtn");
    assert!(identity.profile.avatar_url.is_none());
}

#[tokio::test]
async fn unknown_identity_returns_404() {
    let resp = app().oneshot(get_as("/identity/nobody.json", DEMO)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_remote_id_returns_404() {
    let resp = app()
        .oneshot(get_as("/identity/organization/ghost/id/show.json", DEMO))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- activity ---

#[tokio::test]
async fn create_activity_malformed_json_returns_422() {
    let resp = app()
        .oneshot(post_as("/activity.json", DEMO, Some(r#"{"not_title":1}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn destroy_unknown_activity_returns_404() {
    let resp = app()
        .oneshot(post_as("/activity/destroy/nothing.json", DEMO, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn activity_lifecycle() {
    let app = app();

    // create as demo
    let resp = app
        .clone()
        .oneshot(post_as("/activity.json", DEMO, Some(r#"{"title":"Hello"}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Activity = body_json(resp).await;
    assert_eq!(created.title, "Hello");
    assert!(!created.liked);

    // anyone authenticated can read it
    let resp = app
        .clone()
        .oneshot(get_as(&format!("/activity/{}.json", created.id), JOHN))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Activity = body_json(resp).await;
    assert_eq!(fetched.id, created.id);

    // only the owner can destroy it
    let resp = app
        .clone()
        .oneshot(post_as(&format!("/activity/destroy/{}.json", created.id), JOHN, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(post_as(&format!("/activity/destroy/{}.json", created.id), DEMO, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let destroyed: Activity = body_json(resp).await;
    assert_eq!(destroyed.id, created.id);

    // gone
    let resp = app
        .oneshot(get_as(&format!("/activity/{}.json", created.id), DEMO))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}
