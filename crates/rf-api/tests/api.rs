use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use rf_api::configure_routes;
use rf_api::handlers::AppState;
use rf_core::Services;
use rf_db_sqlite::SqliteStore;
use serde_json::{json, Value};

async fn state() -> web::Data<AppState> {
    let store = SqliteStore::in_memory().await.expect("in-memory store");
    let services = Services::new(Arc::new(store));
    web::Data::new(AppState::new(services, Duration::from_secs(5)))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure_routes)).await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {
        test::call_service(
            &$app,
            test::TestRequest::post().uri($uri).set_json($body).to_request(),
        )
        .await
    };
}

macro_rules! get {
    ($app:expr, $uri:expr) => {
        test::call_service(&$app, test::TestRequest::get().uri($uri).to_request()).await
    };
}

#[actix_web::test]
async fn user_lifecycle_maps_outcomes_to_status_codes() {
    let state = state().await;
    let app = app!(state);

    let body = json!({"fullname": "Ann Smith", "about": "", "email": "ann@example.com"});
    let resp = post_json!(app, "/api/user/ann/create", &body);
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["nickname"], "ann");

    let resp = post_json!(app, "/api/user/ann/create", &body);
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let clash: Value = test::read_body_json(resp).await;
    assert_eq!(clash.as_array().map(Vec::len), Some(1));

    let resp = get!(app, "/api/user/ghost/profile");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let missing: Value = test::read_body_json(resp).await;
    assert!(missing["message"].as_str().unwrap().contains("ghost"));

    let resp = post_json!(app, "/api/user/ann/profile", &json!({"about": "hi"}));
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["about"], "hi");
    assert_eq!(updated["fullname"], "Ann Smith");
}

#[actix_web::test]
async fn thread_vote_and_posts_over_http() {
    let state = state().await;
    let app = app!(state);

    post_json!(
        app,
        "/api/user/ann/create",
        &json!({"fullname": "Ann", "about": "", "email": "ann@example.com"})
    );
    let resp = post_json!(
        app,
        "/api/forum/create",
        &json!({"title": "Rust", "user": "ann", "slug": "rust"})
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json!(
        app,
        "/api/forum/rust/create",
        &json!({"title": "Ownership", "author": "ann", "message": "m", "slug": "own"})
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let thread: Value = test::read_body_json(resp).await;
    assert_eq!(thread["forum"], "rust");
    assert_eq!(thread["votes"], 0);

    let resp = post_json!(app, "/api/thread/own/vote", &json!({"nickname": "ann", "voice": 1}));
    assert_eq!(resp.status(), StatusCode::OK);
    let voted: Value = test::read_body_json(resp).await;
    assert_eq!(voted["votes"], 1);

    let resp = post_json!(app, "/api/thread/own/vote", &json!({"nickname": "ann", "voice": 5}));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json!(
        app,
        "/api/thread/own/create",
        &json!([{"author": "ann", "message": "first"}, {"author": "ann", "message": "second"}])
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let posts: Value = test::read_body_json(resp).await;
    let first = posts[0]["id"].as_i64().unwrap();
    assert_eq!(posts[0]["created"], posts[1]["created"]);
    assert_eq!(posts[0]["isEdited"], false);

    let resp = get!(app, "/api/thread/own/posts?limit=1&desc=true");
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page.as_array().map(Vec::len), Some(1));
    assert_eq!(page[0]["message"], "second");

    let resp = get!(app, "/api/thread/own/posts?since=abc");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/post/{first}/details?related=user,forum");
    let resp = get!(app, &uri);
    assert_eq!(resp.status(), StatusCode::OK);
    let details: Value = test::read_body_json(resp).await;
    assert_eq!(details["author"]["nickname"], "ann");
    assert_eq!(details["forum"]["posts"], 2);
    assert!(details.get("thread").is_none());

    let resp = get!(app, "/api/thread/999/details");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request_with_message() {
    let state = state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/forum/create")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn service_status_and_clear() {
    let state = state().await;
    let app = app!(state);

    post_json!(
        app,
        "/api/user/ann/create",
        &json!({"fullname": "Ann", "about": "", "email": "ann@example.com"})
    );
    let resp = get!(app, "/api/service/status");
    let status: Value = test::read_body_json(resp).await;
    assert_eq!(status, json!({"user": 1, "forum": 0, "thread": 0, "post": 0}));

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/service/clear").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get!(app, "/api/service/status");
    let status: Value = test::read_body_json(resp).await;
    assert_eq!(status["user"], 0);
}
