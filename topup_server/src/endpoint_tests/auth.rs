use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::json;
use topup_engine::{
    db_types::{LogCategory, Role},
    log_objects::LogQuery,
};

use super::helpers::{get, issue_token, post, TestContext, ADMIN_PASSWORD, ADMIN_USERNAME};

fn login_request(username: &str, password: &str) -> TestRequest {
    post("/auth/login", "", json!({"username": username, "password": password}))
}

#[actix_web::test]
async fn admin_login() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.send(login_request(ADMIN_USERNAME, ADMIN_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["username"], ADMIN_USERNAME);
    let token = body["data"]["token"].as_str().expect("No token in login response");
    let (status, _) = ctx.send(get("/api/admin/users", token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn merchant_login() {
    let ctx = TestContext::new().await;
    ctx.add_merchant("toko_budi", "123456").await;
    let (status, body) = ctx.send(login_request("toko_budi", "password")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "merchant");
    let token = body["data"]["token"].as_str().expect("No token in login response");
    let (status, body) = ctx.send(get("/api/history", token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let query = LogQuery { owner: Some("toko_budi".into()), category: Some(LogCategory::Auth), ..Default::default() };
    let entries = ctx.log_api().fetch_logs(&query).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "toko_budi logged in");
}

#[actix_web::test]
async fn wrong_password_is_logged() {
    let ctx = TestContext::new().await;
    ctx.add_merchant("toko_budi", "123456").await;
    let (status, body) = ctx.send(login_request("toko_budi", "not my password")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());

    let (status, _) = ctx.send(login_request(ADMIN_USERNAME, "guess")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let query = LogQuery { owner: Some("toko_budi".into()), ..Default::default() };
    let entries = ctx.log_api().fetch_logs(&query).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, LogCategory::Auth);
    assert_eq!(entries[0].message, "Failed login attempt for toko_budi");
}

#[actix_web::test]
async fn unknown_user_cannot_log_in() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.send(login_request("nobody", "password")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_token() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.send(get("/api/products", "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn invalid_token() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.send(get("/api/products", "not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn bearer_token_is_accepted() {
    let ctx = TestContext::new().await;
    ctx.add_merchant("toko_budi", "123456").await;
    let token = issue_token("toko_budi", Role::Merchant);
    let req = TestRequest::get().uri("/api/history").insert_header(("Authorization", format!("Bearer {token}")));
    let (status, _) = ctx.send(req).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn merchants_cannot_use_admin_endpoints() {
    let ctx = TestContext::new().await;
    let token = issue_token("toko_budi", Role::Merchant);
    let (status, body) = ctx.send(get("/api/admin/users", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn admins_cannot_place_orders() {
    let ctx = TestContext::new().await;
    let token = issue_token(ADMIN_USERNAME, Role::Admin);
    let order = json!({"buyer_sku_code": "ML86", "destination": "12345678", "pin": "123456"});
    let (status, _) = ctx.send(post("/api/transaction", &token, order)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
