use chrono::Utc;
use log::*;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrderRecord, OrderOutcomeFields, OrderRecord, OrderState},
    traits::{is_unique_violation, StoreError},
};

pub async fn insert_order(order: NewOrderRecord, conn: &mut SqliteConnection) -> Result<OrderRecord, StoreError> {
    let now = Utc::now();
    let NewOrderRecord { ref_id, owner, buyer_sku_code, customer_no, status, outcome } = order;
    let record = sqlx::query_as::<_, OrderRecord>(
        r#"INSERT INTO orders
        (ref_id, owner, buyer_sku_code, customer_no, price, sn, message, rc, vendor_status, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *"#,
    )
    .bind(ref_id.as_str())
    .bind(owner)
    .bind(buyer_sku_code)
    .bind(customer_no)
    .bind(outcome.price)
    .bind(outcome.sn)
    .bind(outcome.message)
    .bind(outcome.rc)
    .bind(outcome.vendor_status)
    .bind(status)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::DuplicateReference(ref_id.clone())
        } else {
            StoreError::from(e)
        }
    })?;
    debug!("🗃️ Order {} saved as {} with id {}", record.ref_id, record.status, record.id);
    Ok(record)
}

pub async fn fetch_order_by_ref(ref_id: &str, conn: &mut SqliteConnection) -> Result<Option<OrderRecord>, StoreError> {
    let order = sqlx::query_as::<_, OrderRecord>("SELECT * FROM orders WHERE ref_id = ?")
        .bind(ref_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Moves an order from `expected` to `status`. Returns `None` if the order is no longer in the `expected` state, so
/// a transition is only ever applied once.
pub async fn update_order(
    ref_id: &str,
    expected: OrderState,
    status: OrderState,
    outcome: &OrderOutcomeFields,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderRecord>, StoreError> {
    let order = sqlx::query_as::<_, OrderRecord>(
        r#"UPDATE orders SET
            status = ?,
            price = COALESCE(?, price),
            sn = ?,
            message = ?,
            rc = ?,
            vendor_status = ?,
            updated_at = ?
        WHERE ref_id = ? AND status = ?
        RETURNING *"#,
    )
    .bind(status)
    .bind(outcome.price)
    .bind(outcome.sn.as_deref())
    .bind(outcome.message.as_deref())
    .bind(outcome.rc.as_deref())
    .bind(outcome.vendor_status.as_deref())
    .bind(Utc::now())
    .bind(ref_id)
    .bind(expected)
    .fetch_optional(conn)
    .await?;
    match &order {
        Some(_) => debug!("🗃️ Order {ref_id} is now {status}"),
        None => debug!("🗃️ Order {ref_id} was not {expected} any more. Nothing updated"),
    }
    Ok(order)
}

pub async fn fetch_pending_orders(limit: u32, conn: &mut SqliteConnection) -> Result<Vec<OrderRecord>, StoreError> {
    let orders = sqlx::query_as::<_, OrderRecord>("SELECT * FROM orders WHERE status = ? ORDER BY id ASC LIMIT ?")
        .bind(OrderState::Pending)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    trace!("🗃️ {} pending orders fetched", orders.len());
    Ok(orders)
}

pub async fn fetch_orders_for_owner(owner: &str, conn: &mut SqliteConnection) -> Result<Vec<OrderRecord>, StoreError> {
    let orders = sqlx::query_as::<_, OrderRecord>("SELECT * FROM orders WHERE owner = ? ORDER BY id DESC")
        .bind(owner)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}
