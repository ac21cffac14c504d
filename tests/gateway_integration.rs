//! End-to-end tests: a real gateway app in front of a real local mock
//! upstream, connected over actual sockets (no faked HTTP client).

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, web, App, HttpResponse};
use kairos_hub::logs::LogRing;
use kairos_hub::routes::{configure_admin, configure_catchall, configure_health};
use kairos_hub::services::clock::SystemClock;
use kairos_hub::services::http_client::ReqwestHttpClient;
use kairos_hub::services::registry::Registry;
use kairos_hub::state::AppState;
use serde_json::{json, Value};

fn test_state() -> AppState {
    let clock = Arc::new(SystemClock);
    AppState {
        registry: Arc::new(Registry::new(clock.clone())),
        log_ring: Arc::new(LogRing::new(100)),
        http_client: Arc::new(ReqwestHttpClient::new(2 * 1024 * 1024)),
        clock,
    }
}

async fn spawn_mock_upstream() -> String {
    async fn ping() -> HttpResponse {
        HttpResponse::Ok().json(json!({"ok": true}))
    }
    async fn slow() -> HttpResponse {
        tokio::time::sleep(Duration::from_millis(300)).await;
        HttpResponse::Ok().json(json!({"ok": true}))
    }
    async fn boom() -> HttpResponse {
        HttpResponse::InternalServerError().json(json!({"error": "upstream blew up"}))
    }

    let server = actix_web::HttpServer::new(|| {
        App::new()
            .route("/ping", web::get().to(ping))
            .route("/slow", web::get().to(slow))
            .route("/boom", web::get().to(boom))
    })
    .bind("127.0.0.1:0")
    .expect("bind mock upstream");

    let addr = server.addrs()[0];
    let running = server.run();
    tokio::spawn(running);

    format!("http://{addr}")
}

#[actix_web::test]
async fn happy_path_registers_and_forwards() {
    let upstream = spawn_mock_upstream().await;
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_health)
            .configure(configure_admin)
            .configure(configure_catchall),
    )
    .await;

    let register_body = json!({
        "name": "echo",
        "internal_url": upstream,
        "endpoints": [{"path": "/ping", "method": "GET", "timeout": 5}]
    });
    let req = test::TestRequest::post().uri("/register").set_json(&register_body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["routes_created"], 1);

    let req = test::TestRequest::get().uri("/echo/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn reregistration_drops_removed_endpoints_immediately() {
    let upstream = spawn_mock_upstream().await;
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_admin)
            .configure(configure_catchall),
    )
    .await;

    let first = json!({
        "name": "echo",
        "internal_url": upstream,
        "endpoints": [{"path": "/ping", "method": "GET"}, {"path": "/boom", "method": "GET"}]
    });
    let req = test::TestRequest::post().uri("/register").set_json(&first).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let second = json!({
        "name": "echo",
        "internal_url": upstream,
        "endpoints": [{"path": "/boom", "method": "GET"}]
    });
    let req = test::TestRequest::post().uri("/register").set_json(&second).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get().uri("/echo/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get().uri("/echo/boom").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);
}

#[actix_web::test]
async fn unresolved_route_is_404() {
    let state = test_state();
    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).configure(configure_admin).configure(configure_catchall),
    )
    .await;

    let req = test::TestRequest::get().uri("/nowhere/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not found");
}

#[actix_web::test]
async fn reserved_name_is_rejected() {
    let state = test_state();
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_admin))
        .await;

    let body = json!({
        "name": "register",
        "internal_url": "http://127.0.0.1:1",
        "endpoints": [{"path": "/a"}]
    });
    let req = test::TestRequest::post().uri("/register").set_json(&body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let json_body: Value = test::read_body_json(resp).await;
    assert_eq!(json_body["error"], "Reserved service name");

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["service_count"], 0);
}

#[actix_web::test]
async fn upstream_timeout_maps_to_504() {
    let upstream = spawn_mock_upstream().await;
    let state = test_state();
    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).configure(configure_admin).configure(configure_catchall),
    )
    .await;

    let body = json!({
        "name": "slowsvc",
        "internal_url": upstream,
        "endpoints": [{"path": "/slow", "method": "GET", "timeout": 1}]
    });
    let req = test::TestRequest::post().uri("/register").set_json(&body).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get().uri("/slowsvc/slow").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 504);
}
