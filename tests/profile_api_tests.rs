//! Profile, social link and public page HTTP tests

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::TestEnv;

#[actix_rt::test]
async fn test_get_and_update_profile() {
    let env = TestEnv::new().await;
    env.seed_account("u-alice", "alice").await;
    let app = test_app!(env);
    let auth = env.bearer("u-alice");

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/profile")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["theme"], "light");

    let resp = test::call_service(
        &app,
        TestRequest::patch()
            .uri("/api/profile")
            .insert_header(auth.clone())
            .set_json(json!({"bio": "<i>hi</i>", "theme": "dark", "display_name": null}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["bio"], "ihi/i");
    assert_eq!(body["theme"], "dark");
    assert_eq!(body["display_name"], Value::Null);
    assert_eq!(body["username"], "alice");

    let resp = test::call_service(
        &app,
        TestRequest::patch()
            .uri("/api/profile")
            .insert_header(auth)
            .set_json(json!({"theme": "neon", "username": "no"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["username", "theme"]);
}

#[actix_rt::test]
async fn test_username_change_conflicts() {
    let env = TestEnv::new().await;
    env.seed_account("u-alice", "alice").await;
    env.seed_account("u-bob", "bob").await;
    let app = test_app!(env);

    let resp = test::call_service(
        &app,
        TestRequest::patch()
            .uri("/api/profile")
            .insert_header(env.bearer("u-bob"))
            .set_json(json!({"username": " Alice "}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Username already taken");
}

#[actix_rt::test]
async fn test_social_links_are_owner_scoped() {
    let env = TestEnv::new().await;
    env.seed_account("u-alice", "alice").await;
    env.seed_account("u-bob", "bob").await;
    let app = test_app!(env);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/social-links")
            .insert_header(env.bearer("u-alice"))
            .set_json(json!({"platform": "github", "url": "https://github.com/alice"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/social-links")
            .insert_header(env.bearer("u-alice"))
            .set_json(json!({"platform": "", "url": "mailto:a@b.co"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/social-links/{}", id))
            .insert_header(env.bearer("u-bob"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Social link not found");

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/social-links")
            .insert_header(env.bearer("u-alice"))
            .to_request(),
    )
    .await;
    let list: Value = test::read_body_json(resp).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let resp = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/social-links/{}", id))
            .insert_header(env.bearer("u-alice"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_profile_and_social_routes_require_login() {
    let env = TestEnv::new().await;
    env.seed_account("u-anon", "anon").await;
    let app = test_app!(env);

    for req in [
        TestRequest::get().uri("/api/profile"),
        TestRequest::patch()
            .uri("/api/profile")
            .set_json(json!({"bio": "x"})),
        TestRequest::get().uri("/api/social-links"),
        TestRequest::post()
            .uri("/api/social-links")
            .set_json(json!({"platform": "github", "url": "https://github.com/a"})),
        TestRequest::delete().uri("/api/social-links/any-id"),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn test_social_platform_empty_after_sanitizing_is_rejected() {
    let env = TestEnv::new().await;
    env.seed_account("u-tags", "tags").await;
    let app = test_app!(env);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/social-links")
            .insert_header(env.bearer("u-tags"))
            .set_json(json!({"platform": "<>", "url": "https://github.com/a"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "platform");
    assert_eq!(body["errors"][0]["message"], "Platform is required");
}

#[actix_rt::test]
async fn test_public_page_shows_active_links_in_order() {
    let env = TestEnv::new().await;
    env.seed_account("u-alice", "alice").await;
    let app = test_app!(env);
    let auth = env.bearer("u-alice");

    let mut ids = Vec::new();
    for title in ["First", "Hidden", "Last"] {
        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/links")
                .insert_header(auth.clone())
                .set_json(json!({"title": title, "url": "https://example.com"}))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }
    test::call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/api/links/{}/toggle", ids[1]))
            .insert_header(auth)
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/public/Alice").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["profile"]["username"], "alice");
    let titles: Vec<&str> = page["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Last"]);
    assert!(page["social_links"].as_array().unwrap().is_empty());

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/public/nobody").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
