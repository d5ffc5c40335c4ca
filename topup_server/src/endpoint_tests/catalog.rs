use actix_web::http::StatusCode;
use serde_json::json;
use topup_engine::db_types::{Role, Rupiah, SkuEntry};
use wiremock::{
    matchers::{method, path, query_param},
    Mock,
    MockServer,
    ResponseTemplate,
};

use super::helpers::{get, issue_token, post, TestContext};

fn sku(code: &str, price: i64, active: bool) -> SkuEntry {
    SkuEntry {
        brand: "MOBILE LEGENDS".to_string(),
        category: "Games".to_string(),
        product_name: format!("Mobile Legends {code}"),
        price: Rupiah::from(price),
        seller_product_status: active,
        buyer_sku_code: code.to_string(),
        buyer_product_status: Some(true),
        desc: None,
    }
}

async fn merchant_context() -> (TestContext, String) {
    let ctx = TestContext::new().await;
    ctx.add_merchant("toko_budi", "123456").await;
    (ctx, issue_token("toko_budi", Role::Merchant))
}

#[actix_web::test]
async fn products_can_be_browsed_by_category_and_brand() {
    let (ctx, token) = merchant_context().await;
    let mut pulsa = sku("TSEL5", 5_500, true);
    pulsa.brand = "TELKOMSEL".to_string();
    pulsa.category = "Pulsa".to_string();
    ctx.vendor.set_price_list(vec![sku("ML257", 58_000, true), pulsa, sku("ML86", 19_500, true)]);
    let (status, _) = ctx.send(post("/api/pricelist", &token, json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.send(get("/api/products", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categories"], json!(["Games", "Pulsa"]));

    let (status, body) = ctx.send(get("/api/products?category=Games", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["brands"], json!(["MOBILE LEGENDS"]));

    let (status, body) = ctx.send(get("/api/products?category=Games&brand=MOBILE%20LEGENDS", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let products = body["data"]["products"].as_array().unwrap();
    let codes = products.iter().map(|p| p["buyer_sku_code"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(codes, vec!["ML86", "ML257"]);

    let (status, body) = ctx.send(get("/api/products?brand=TELKOMSEL", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn sync_keeps_active_products() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.set_price_list(vec![sku("ML86", 19_500, true), sku("ML172", 39_000, false), sku("ML257", 58_000, true)]);
    let (status, body) = ctx.send(post("/api/pricelist", &token, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Catalog synced. 2 products available");
    let products = body["data"].as_array().unwrap();
    let codes = products.iter().map(|p| p["buyer_sku_code"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(codes, vec!["ML86", "ML257"]);
    assert_eq!(products[0]["price"], 19_500);

    let (status, body) = ctx.send(get("/api/products", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner"], "toko_budi");
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn products_before_sync() {
    let (ctx, token) = merchant_context().await;
    let (status, body) = ctx.send(get("/api/products", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn deposit_balance() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.set_balance(Rupiah::from(1_250_000));
    let (status, body) = ctx.send(post("/api/balance", &token, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deposit"], 1_250_000);
}

#[actix_web::test]
async fn check_player_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ml"))
        .and(query_param("id", "12345678"))
        .and(query_param("server", "2001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "name": "RRQ Hoshi"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;
    let (mut ctx, token) = merchant_context().await;
    ctx.vendor_config = ctx.vendor_config.clone().with_nickname_url(server.uri());

    let lookup = json!({"game": "MOBILE LEGENDS", "userId": "12345678", "zoneId": "2001"});
    let (status, body) = ctx.send(post("/api/check-id", &token, lookup)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nickname"], "RRQ Hoshi");

    let lookup = json!({"game": "FREE FIRE", "user_id": "999"});
    let (status, _) = ctx.send(post("/api/check-id", &token, lookup)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let lookup = json!({"game": "GENSHIN IMPACT", "user_id": "999"});
    let (status, _) = ctx.send(post("/api/check-id", &token, lookup)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let lookup = json!({"game": "MOBILE LEGENDS", "user_id": "12345678"});
    let (status, _) = ctx.send(post("/api/check-id", &token, lookup)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
