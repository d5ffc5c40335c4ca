use cucumber::{given, then, when};
use topup_engine::{
    db_types::{NewMerchant, OrderState, Rupiah, SkuEntry},
    log_objects::{latest_by_reference, LogQuery},
    order_objects::OrderRequest,
    test_utils::scripted_vendor::vendor_reply,
    traits::CatalogManagement,
    CredentialError,
    OrderFlowError,
    VendorError,
};

use crate::cucumber::StorefrontWorld;

#[given(expr = "a merchant {string} with PIN {string}")]
async fn create_merchant(world: &mut StorefrontWorld, username: String, pin: String) {
    let sys = world.system().await;
    let merchant = NewMerchant::new(username.as_str(), "password", pin.as_str(), "digi_user", "digi-key");
    sys.credentials.create_merchant(merchant).await.expect("Error creating merchant");
}

#[given(expr = "the catalog of {word} lists {word} under {string}")]
async fn list_sku(world: &mut StorefrontWorld, owner: String, sku: String, brand: String) {
    let sys = world.system().await;
    let db = sys.orders.db();
    let catalog = db.fetch_catalog(&owner).await.expect("Error fetching catalog");
    let mut products = catalog.map(|c| c.products).unwrap_or_default();
    products.push(SkuEntry {
        brand,
        category: "Pulsa".to_string(),
        product_name: sku.clone(),
        price: Rupiah::from(5_500),
        seller_product_status: true,
        buyer_sku_code: sku,
        buyer_product_status: Some(true),
        desc: None,
    });
    db.upsert_catalog(&owner, &products).await.expect("Error storing catalog");
}

#[when(expr = "the admin creates a merchant {string}")]
async fn admin_creates_merchant(world: &mut StorefrontWorld, username: String) {
    let sys = world.system().await;
    let merchant = NewMerchant::new(username.as_str(), "password", "999999", "digi_user", "digi-key");
    let result = sys.credentials.create_merchant(merchant).await;
    world.last_credential_error = result.err();
}

#[then(expr = "the merchant is rejected as a duplicate")]
async fn merchant_is_duplicate(world: &mut StorefrontWorld) {
    assert!(matches!(world.last_credential_error, Some(CredentialError::DuplicateUsername(_))));
}

#[then(expr = "there is/are {int} merchant(s)")]
async fn merchant_count(world: &mut StorefrontWorld, count: usize) {
    let sys = world.system().await;
    let merchants = sys.credentials.list_merchants().await.expect("Error listing merchants");
    assert_eq!(merchants.len(), count);
}

#[given(expr = "the vendor answers order {word} with rc {word}")]
async fn script_reply(world: &mut StorefrontWorld, ref_id: String, rc: String) {
    let sys = world.system().await;
    sys.vendor.script(ref_id, Ok(vendor_reply(&rc, None, "vendor reply")));
}

#[given(expr = "the vendor answers order {word} with rc {word} and sn {word}")]
async fn script_reply_with_sn(world: &mut StorefrontWorld, ref_id: String, rc: String, sn: String) {
    let sys = world.system().await;
    sys.vendor.script(ref_id, Ok(vendor_reply(&rc, Some(&sn), "vendor reply")));
}

#[given(expr = "the vendor is unreachable for order {word}")]
async fn script_transport_error(world: &mut StorefrontWorld, ref_id: String) {
    let sys = world.system().await;
    sys.vendor.script(ref_id, Err(VendorError::Transport("connection refused".into())));
}

#[when(expr = "{word} orders {word} for {word} as {word} with PIN {string}")]
async fn place_order(
    world: &mut StorefrontWorld,
    owner: String,
    sku: String,
    destination: String,
    ref_id: String,
    pin: String,
) {
    let request = OrderRequest::new(sku, destination, pin).with_ref_id(ref_id);
    submit(world, owner, request).await;
}

#[when(expr = "{word} orders {word} for {word} zone {word} as {word} with PIN {string}")]
async fn place_zoned_order(
    world: &mut StorefrontWorld,
    owner: String,
    sku: String,
    destination: String,
    zone: String,
    ref_id: String,
    pin: String,
) {
    let request =
        OrderRequest::new(sku, destination, pin).with_brand("MOBILE LEGENDS").with_zone_id(zone).with_ref_id(ref_id);
    submit(world, owner, request).await;
}

async fn submit(world: &mut StorefrontWorld, owner: String, request: OrderRequest) {
    let sys = world.system().await;
    let result = sys.orders.place_order(&owner, request).await;
    world.last_outcome = Some(result);
}

#[when(expr = "{word} checks the status of {word}")]
async fn check_status(world: &mut StorefrontWorld, owner: String, ref_id: String) {
    let sys = world.system().await;
    let result = sys.orders.check_order_status(Some(&owner), &ref_id).await;
    world.last_outcome = Some(result);
}

#[when(expr = "a reconciliation pass runs")]
async fn reconcile(world: &mut StorefrontWorld) {
    let sys = world.system().await;
    let result = sys.orders.reconcile_pending(50).await.expect("Reconciliation pass failed");
    world.last_reconciliation = Some(result);
}

#[then(expr = "the order status is {word}")]
async fn order_status_is(world: &mut StorefrontWorld, status: String) {
    let expected = status.parse::<OrderState>().expect("Not an order state");
    match &world.last_outcome {
        Some(Ok(outcome)) => assert_eq!(outcome.status, expected),
        other => panic!("Expected an order outcome, got {other:?}"),
    }
}

#[then(expr = "the order has serial number {word}")]
async fn order_has_sn(world: &mut StorefrontWorld, sn: String) {
    match &world.last_outcome {
        Some(Ok(outcome)) => assert_eq!(outcome.order.sn.as_deref(), Some(sn.as_str())),
        other => panic!("Expected an order outcome, got {other:?}"),
    }
}

#[then(expr = "the order is rejected because the PIN is wrong")]
async fn order_rejected_pin(world: &mut StorefrontWorld) {
    assert!(matches!(world.last_outcome, Some(Err(OrderFlowError::InvalidPin))));
}

#[then(expr = "the vendor received {int} transaction(s)")]
async fn vendor_calls(world: &mut StorefrontWorld, count: usize) {
    let sys = world.system().await;
    assert_eq!(sys.vendor.call_count(), count);
}

#[then(expr = "the latest log entry for {word} is {word}")]
async fn latest_log_for(world: &mut StorefrontWorld, ref_id: String, status: String) {
    let expected = status.parse::<OrderState>().expect("Not an order state");
    let sys = world.system().await;
    let logs = sys.logs.fetch_logs(&LogQuery::default()).await.expect("Error fetching logs");
    let latest = latest_by_reference(&logs);
    let entry = latest.iter().find(|e| e.ref_id.as_deref() == Some(ref_id.as_str())).expect("No log entry found");
    assert_eq!(entry.status, Some(expected));
}

#[then(expr = "the latest log entry for {word} mentions {string}")]
async fn latest_log_mentions(world: &mut StorefrontWorld, ref_id: String, text: String) {
    let sys = world.system().await;
    let logs = sys.logs.fetch_logs(&LogQuery::default().with_ref_id(ref_id)).await.expect("Error fetching logs");
    let entry = logs.first().expect("No log entry found");
    assert!(entry.message.contains(&text), "'{}' does not contain '{text}'", entry.message);
}

#[then(expr = "there are {int} log entries for {word}")]
async fn log_count_for(world: &mut StorefrontWorld, count: usize, ref_id: String) {
    let sys = world.system().await;
    let logs = sys.logs.fetch_logs(&LogQuery::default().with_ref_id(ref_id)).await.expect("Error fetching logs");
    assert_eq!(logs.len(), count);
}

#[then(expr = "the pass resolved {int} and left {int} pending")]
async fn reconciliation_tally(world: &mut StorefrontWorld, resolved: usize, pending: usize) {
    let result = world.last_reconciliation.expect("No reconciliation pass has run");
    assert_eq!(result.resolved, resolved);
    assert_eq!(result.still_pending, pending);
}

#[then(expr = "{word} has {int} order(s) in the history")]
async fn history_count(world: &mut StorefrontWorld, owner: String, count: usize) {
    let sys = world.system().await;
    let history = sys.logs.transaction_history(&owner).await.expect("Error fetching history");
    assert_eq!(history.len(), count);
}
