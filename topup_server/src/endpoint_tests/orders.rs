use actix_web::http::StatusCode;
use serde_json::{json, Value};
use topup_engine::{
    db_types::{LogCategory, Role, Rupiah, SkuEntry},
    test_utils::scripted_vendor::vendor_reply,
};

use super::{
    helpers::{get, issue_token, post, TestContext},
    mocks::MockVendor,
};

fn order(ref_id: &str, pin: &str) -> Value {
    json!({"buyer_sku_code": "TSEL5", "destination": "081234567890", "brand": "TELKOMSEL", "pin": pin, "ref_id": ref_id})
}

async fn merchant_context() -> (TestContext, String) {
    let ctx = TestContext::new().await;
    ctx.add_merchant("toko_budi", "123456").await;
    (ctx, issue_token("toko_budi", Role::Merchant))
}

#[actix_web::test]
async fn successful_order() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.script("INV-001", Ok(vendor_reply("00", Some("ABC123"), "Sukses")));
    let (status, body) = ctx.send(post("/api/transaction", &token, order("INV-001", "123456"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["message"], "Sukses");
    assert_eq!(body["data"]["ref_id"], "INV-001");
    assert_eq!(body["data"]["order"]["sn"], "ABC123");
    assert_eq!(body["data"]["order"]["owner"], "toko_budi");

    let calls = ctx.vendor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].customer_no, "081234567890");
    assert_eq!(calls[0].buyer_sku_code, "TSEL5");
}

#[actix_web::test]
async fn wrong_pin_never_reaches_the_vendor() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.script("INV-002", Ok(vendor_reply("00", Some("ABC123"), "Sukses")));
    let (status, body) = ctx.send(post("/api/transaction", &token, order("INV-002", "000000"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(ctx.vendor.call_count(), 0);
    let history = ctx.log_api().transaction_history("toko_budi").await.unwrap();
    assert!(history.is_empty());
}

#[actix_web::test]
async fn wrong_pin_with_a_strict_vendor() {
    let (ctx, token) = merchant_context().await;
    let mut vendor = MockVendor::new();
    vendor.expect_submit_transaction().never();
    let catalog_vendor = MockVendor::new();
    let req = post("/api/transaction", &token, order("INV-003", "1"));
    let (status, _) = ctx.send_with(catalog_vendor, vendor, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn pending_order_resolves_on_status_check() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.script("INV-004", Ok(vendor_reply("03", None, "Pending")));
    ctx.vendor.script("INV-004", Ok(vendor_reply("00", Some("SN-778899"), "Sukses")));
    let (status, body) = ctx.send(post("/api/transaction", &token, order("INV-004", "123456"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING");
    assert!(body["data"]["order"]["sn"].is_null());

    let (status, body) = ctx.send(post("/api/status", &token, json!({"ref_id": "INV-004"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["data"]["order"]["sn"], "SN-778899");

    // Terminal orders are answered from the store
    let (status, body) = ctx.send(post("/api/status", &token, json!({"ref_id": "INV-004"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(ctx.vendor.call_count(), 2);
}

#[actix_web::test]
async fn vendor_failure_is_a_failed_order() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.script("INV-005", Ok(vendor_reply("44", None, "Saldo tidak cukup")));
    let (status, body) = ctx.send(post("/api/transaction", &token, order("INV-005", "123456"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["message"], "Saldo tidak cukup");
}

#[actix_web::test]
async fn other_merchants_orders_are_not_found() {
    let (ctx, token) = merchant_context().await;
    ctx.add_merchant("toko_sari", "654321").await;
    ctx.vendor.script("INV-006", Ok(vendor_reply("03", None, "Pending")));
    let (status, _) = ctx.send(post("/api/transaction", &token, order("INV-006", "123456"))).await;
    assert_eq!(status, StatusCode::OK);

    let other = issue_token("toko_sari", Role::Merchant);
    let (status, body) = ctx.send(post("/api/status", &other, json!({"ref_id": "INV-006"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("status").is_none());
    assert_eq!(ctx.vendor.call_count(), 1);
}

#[actix_web::test]
async fn empty_destination() {
    let (ctx, token) = merchant_context().await;
    let body = json!({"buyer_sku_code": "ML86", "destination": "  ", "pin": "123456"});
    let (status, body) = ctx.send(post("/api/transaction", &token, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(ctx.vendor.call_count(), 0);
}

#[actix_web::test]
async fn mobile_legends_needs_a_zone() {
    let (ctx, token) = merchant_context().await;
    let body = json!({"buyer_sku_code": "ML86", "destination": "12345678", "brand": "MOBILE LEGENDS", "pin": "123456"});
    let (status, _) = ctx.send(post("/api/transaction", &token, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.vendor.script("INV-007", Ok(vendor_reply("00", Some("SN1"), "Sukses")));
    let body = json!({
        "buyer_sku_code": "ML86",
        "destination": "12345678",
        "zone_id": "2001",
        "brand": "MOBILE LEGENDS",
        "pin": "123456",
        "ref_id": "INV-007"
    });
    let (status, _) = ctx.send(post("/api/transaction", &token, body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.vendor.calls()[0].customer_no, "123456782001");
}

#[actix_web::test]
async fn synced_game_sku_needs_a_zone_without_a_brand() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.set_price_list(vec![SkuEntry {
        brand: "MOBILE LEGENDS".to_string(),
        category: "Games".to_string(),
        product_name: "Mobile Legends 86 Diamonds".to_string(),
        price: Rupiah::from(19_500),
        seller_product_status: true,
        buyer_sku_code: "ML86".to_string(),
        buyer_product_status: Some(true),
        desc: None,
    }]);
    let (status, _) = ctx.send(post("/api/pricelist", &token, json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({"buyer_sku_code": "ML86", "destination": "12345678", "pin": "123456", "ref_id": "INV-Z1"});
    let (status, body) = ctx.send(post("/api/transaction", &token, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(ctx.vendor.call_count(), 0);

    ctx.vendor.script("INV-Z2", Ok(vendor_reply("00", Some("SN1"), "Sukses")));
    let body = json!({
        "buyer_sku_code": "ML86",
        "destination": "12345678",
        "zone_id": "2001",
        "pin": "123456",
        "ref_id": "INV-Z2"
    });
    let (status, _) = ctx.send(post("/api/transaction", &token, body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.vendor.calls()[0].customer_no, "123456782001");
}

#[actix_web::test]
async fn unlisted_sku_needs_a_brand() {
    let (ctx, token) = merchant_context().await;
    let body = json!({"buyer_sku_code": "ML86", "destination": "12345678", "pin": "123456"});
    let (status, body) = ctx.send(post("/api/transaction", &token, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(ctx.vendor.call_count(), 0);
}

#[actix_web::test]
async fn duplicate_reference() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.script("INV-008", Ok(vendor_reply("00", Some("SN1"), "Sukses")));
    let (status, _) = ctx.send(post("/api/transaction", &token, order("INV-008", "123456"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = ctx.send(post("/api/transaction", &token, order("INV-008", "123456"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(ctx.vendor.call_count(), 1);
}

#[actix_web::test]
async fn history_and_logs_are_per_merchant() {
    let (ctx, token) = merchant_context().await;
    ctx.add_merchant("toko_sari", "654321").await;
    let other = issue_token("toko_sari", Role::Merchant);
    ctx.vendor.script("INV-010", Ok(vendor_reply("00", Some("SN1"), "Sukses")));
    ctx.vendor.script("INV-011", Ok(vendor_reply("03", None, "Pending")));
    ctx.vendor.script("INV-012", Ok(vendor_reply("00", Some("SN2"), "Sukses")));
    ctx.send(post("/api/transaction", &token, order("INV-010", "123456"))).await;
    ctx.send(post("/api/transaction", &token, order("INV-011", "123456"))).await;
    ctx.send(post("/api/transaction", &other, order("INV-012", "654321"))).await;

    let (status, body) = ctx.send(get("/api/history", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["ref_id"], "INV-011");
    assert_eq!(orders[1]["ref_id"], "INV-010");

    let (status, body) = ctx.send(get("/api/logs?category=transaction", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["owner"] == "toko_budi"));

    let (status, body) = ctx.send(get("/api/logs?ref_id=INV-012", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn latest_logs_give_one_entry_per_order() {
    let (ctx, token) = merchant_context().await;
    ctx.vendor.script("INV-020", Ok(vendor_reply("03", None, "Pending")));
    ctx.vendor.script("INV-020", Ok(vendor_reply("00", Some("SN-20"), "Sukses")));
    ctx.vendor.script("INV-021", Ok(vendor_reply("03", None, "Pending")));
    ctx.send(post("/api/transaction", &token, order("INV-020", "123456"))).await;
    ctx.send(post("/api/transaction", &token, order("INV-021", "123456"))).await;
    ctx.send(post("/api/status", &token, json!({"ref_id": "INV-020"}))).await;
    ctx.send(post("/api/log", &token, json!({"type": "system", "message": "Shift closed"}))).await;

    let (status, body) = ctx.send(get("/api/logs", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, body) = ctx.send(get("/api/logs?latest=true", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["ref_id"], "INV-020");
    assert_eq!(entries[0]["status"], "SUCCESS");
    assert_eq!(entries[1]["ref_id"], "INV-021");
    assert_eq!(entries[1]["status"], "PENDING");
}

#[actix_web::test]
async fn append_log_entry() {
    let (ctx, token) = merchant_context().await;
    let entry = json!({"type": "error", "message": "Printer offline"});
    let (status, body) = ctx.send(post("/api/log", &token, entry)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "error");
    assert_eq!(body["data"]["owner"], "toko_budi");

    let entries = ctx.log_api().fetch_logs(&Default::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, LogCategory::Error);
    assert_eq!(entries[0].message, "Printer offline");

    let (status, _) = ctx.send(post("/api/log", &token, json!({"type": "gossip", "message": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
