//! Middleware and health endpoint tests

mod common;

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, HttpResponse, web};
use serde_json::Value;

use common::TestEnv;
use linkhub::api::middleware::{CatchPanic, RequestIdMiddleware};

async fn boom() -> HttpResponse {
    panic!("handler exploded");
}

async fn fine() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

#[actix_rt::test]
async fn test_panic_becomes_500_and_worker_survives() {
    let app = test::init_service(
        App::new()
            .wrap(CatchPanic)
            .wrap(RequestIdMiddleware)
            .route("/boom", web::get().to(boom))
            .route("/fine", web::get().to(fine)),
    )
    .await;

    // panic 以 Err 返回，由服务器渲染成响应
    let err = test::try_call_service(
        &app,
        TestRequest::get()
            .uri("/boom")
            .insert_header(("x-request-id", "trace-boom-1"))
            .to_request(),
    )
    .await
    .unwrap_err();
    let resp = err.error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-boom-1");
    let body = to_bytes(resp.into_body()).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Internal server error");

    let resp = test::call_service(&app, TestRequest::get().uri("/fine").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_routed_requests_pass_through_panic_boundary() {
    let env = TestEnv::new().await;
    env.seed_account("u-routed", "routed").await;
    let app = test_app!(env);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/links")
            .insert_header(env.bearer("u-routed"))
            .set_json(serde_json::json!({"title": "Site", "url": "https://a.com"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/public/routed").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_request_id_reuses_valid_client_id() {
    let env = TestEnv::new().await;
    let app = test_app!(env);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/health/live")
            .insert_header(("x-request-id", "client-abc_123"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "client-abc_123");

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/health/live")
            .insert_header(("x-request-id", "bad id with spaces"))
            .to_request(),
    )
    .await;
    let echoed = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_ne!(echoed, "bad id with spaces");
    assert_eq!(echoed.len(), 36);
}

#[actix_rt::test]
async fn test_health_reports_database_status() {
    let env = TestEnv::new().await;
    let app = test_app!(env);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
    assert!(body["uptime_secs"].is_u64());

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn test_health_unavailable_after_close() {
    let env = TestEnv::new().await;
    let app = test_app!(env);

    env.storage.close().await.unwrap();

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
}

#[actix_rt::test]
async fn test_unknown_route_is_404_with_request_id() {
    let env = TestEnv::new().await;
    let app = test_app!(env);

    let resp = test::call_service(&app, TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().contains_key("x-request-id"));
}
