use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{LogCategory, NewLogEntry, NewOrderRecord, OrderOutcomeFields, OrderRecord, OrderState},
    events::{EventProducers, OrderPlacedEvent, OrderResolvedEvent},
    helpers::{customer_number, generate_reference_id, is_valid_reference_id},
    topup_api::{
        credential_api::{vendor_credentials_for, verify_secret},
        errors::OrderFlowError,
        order_objects::{OrderOutcome, OrderRequest, ReconciliationResult},
    },
    traits::{StorefrontDatabase, TransactionRequest, VendorGateway},
    CredentialError,
};

/// `OrderFlowApi` is the primary API for the purchase workflow: placing orders, checking on them, and reconciling
/// the orders the vendor reported as pending.
///
/// Every order is classified by its vendor result code ([`OrderState::classify`]). The first classification creates
/// the order record; each later change of state updates it and appends an activity-log entry, in one transaction.
pub struct OrderFlowApi<B, V> {
    db: B,
    vendor: V,
    producers: EventProducers,
}

impl<B, V> Debug for OrderFlowApi<B, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, V> OrderFlowApi<B, V> {
    pub fn new(db: B, vendor: V, producers: EventProducers) -> Self {
        Self { db, vendor, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn vendor(&self) -> &V {
        &self.vendor
    }
}

impl<B, V> OrderFlowApi<B, V>
where
    B: StorefrontDatabase,
    V: VendorGateway,
{
    /// Places an order on behalf of `owner`.
    ///
    /// The request is validated and the PIN checked before anything is sent to the vendor. Once the vendor has been
    /// called, the order is always recorded: a transport failure or a reply without data is recorded as `FAILED`.
    pub async fn place_order(&self, owner: &str, request: OrderRequest) -> Result<OrderOutcome, OrderFlowError> {
        let transaction = self.prepare_transaction(owner, &request).await?;
        let merchant = self
            .db
            .fetch_merchant_by_username(owner)
            .await?
            .ok_or_else(|| CredentialError::MerchantNotFound(owner.to_string()))?;
        if !verify_secret(request.pin.reveal(), &merchant.pin_hash).await? {
            warn!("🔄️ Wrong transaction PIN for {owner}. Order {} was not sent to the vendor", transaction.ref_id);
            return Err(OrderFlowError::InvalidPin);
        }
        let credentials = vendor_credentials_for(&merchant)?;

        debug!("🔄️ Sending order {} ({}) for {owner}", transaction.ref_id, transaction.buyer_sku_code);
        let (status, outcome, category) = match self.vendor.submit_transaction(&credentials, &transaction).await {
            Ok(reply) => (reply.state(), reply.outcome(), LogCategory::Transaction),
            Err(e) => {
                warn!("🔄️ Order {} could not be placed with the vendor. {e}", transaction.ref_id);
                let outcome = OrderOutcomeFields { message: Some(e.to_string()), ..Default::default() };
                (OrderState::Failed, outcome, LogCategory::Error)
            },
        };
        let TransactionRequest { buyer_sku_code, customer_no, ref_id } = transaction;
        let new_order =
            NewOrderRecord { ref_id, owner: owner.to_string(), buyer_sku_code, customer_no, status, outcome };
        let detail = outcome_detail(status, &new_order.outcome);
        let entry = NewLogEntry::for_order(category, &new_order, status, &detail);
        let (order, _) = self.db.record_new_order(new_order, entry).await?;
        info!("🔄️ Order {} for {owner} placed. Status: {}", order.ref_id, order.status);

        self.call_order_placed_hook(&order).await;
        if order.status.is_terminal() {
            self.call_order_resolved_hook(&order, None).await;
        }
        Ok(OrderOutcome::new(order))
    }

    /// Asks the vendor for the current state of an order.
    ///
    /// If `owner` is given, the order must belong to it. Orders already in a terminal state are returned as-is,
    /// without calling the vendor.
    pub async fn check_order_status(&self, owner: Option<&str>, ref_id: &str) -> Result<OrderOutcome, OrderFlowError> {
        let order = self
            .db
            .fetch_order_by_ref(ref_id)
            .await?
            .filter(|o| owner.map_or(true, |owner| o.owner == owner))
            .ok_or_else(|| OrderFlowError::OrderNotFound(ref_id.to_string()))?;
        if order.status.is_terminal() {
            trace!("🔄️ Order {ref_id} is already {}. No need to ask the vendor", order.status);
            return Ok(OrderOutcome::new(order));
        }
        let order = self.refresh_order(order).await?;
        Ok(OrderOutcome::new(order))
    }

    /// Runs one reconciliation pass over at most `limit` pending orders, oldest first.
    ///
    /// A failure for one order is logged and counted; it does not stop the pass.
    pub async fn reconcile_pending(&self, limit: u32) -> Result<ReconciliationResult, OrderFlowError> {
        let pending = self.db.fetch_pending_orders(limit).await?;
        let mut result = ReconciliationResult::default();
        for order in pending {
            let ref_id = order.ref_id.clone();
            result.checked += 1;
            match self.refresh_order(order).await {
                Ok(o) if o.status.is_terminal() => result.resolved += 1,
                Ok(_) => result.still_pending += 1,
                Err(e) => {
                    warn!("🔄️ Could not reconcile order {ref_id}. {e}");
                    result.failures += 1;
                },
            }
        }
        if result.checked > 0 {
            info!(
                "🔄️ Reconciliation pass complete. {} checked, {} resolved, {} still pending, {} failed",
                result.checked, result.resolved, result.still_pending, result.failures
            );
        }
        Ok(result)
    }

    /// Re-submits the recorded transaction and applies the new classification if it differs from the stored one.
    async fn refresh_order(&self, order: OrderRecord) -> Result<OrderRecord, OrderFlowError> {
        let merchant = self
            .db
            .fetch_merchant_by_username(&order.owner)
            .await?
            .ok_or_else(|| CredentialError::MerchantNotFound(order.owner.clone()))?;
        let credentials = vendor_credentials_for(&merchant)?;
        let transaction = TransactionRequest {
            buyer_sku_code: order.buyer_sku_code.clone(),
            customer_no: order.customer_no.clone(),
            ref_id: order.ref_id.clone(),
        };
        let reply = self.vendor.submit_transaction(&credentials, &transaction).await?;
        let status = reply.state();
        if status == order.status {
            trace!("🔄️ Order {} is still {status}", order.ref_id);
            return Ok(order);
        }
        let outcome = reply.outcome();
        let previous = order.status;
        let detail = outcome_detail(status, &outcome);
        let entry = NewLogEntry::for_order(LogCategory::Transaction, &NewOrderRecord::from(&order), status, &detail);
        let change = self.db.record_order_change(&order.ref_id, previous, status, &outcome, entry).await?;
        let Some((order, _)) = change else {
            // Another check got there first and has already logged the change
            debug!("🔄️ Order {} was updated by another check while we were asking the vendor", order.ref_id);
            let current = self.db.fetch_order_by_ref(&order.ref_id).await?;
            return current.ok_or_else(|| OrderFlowError::OrderNotFound(order.ref_id.clone()));
        };
        info!("🔄️ Order {} moved from {previous} to {status}", order.ref_id);
        self.call_order_resolved_hook(&order, Some(previous)).await;
        Ok(order)
    }

    /// Validates the request and resolves the reference id and customer number. Makes no vendor calls.
    ///
    /// The brand that decides the zone rule comes from the owner's synced catalog when the SKU is listed there. The
    /// brand on the request is only used for SKUs the catalog does not know.
    async fn prepare_transaction(
        &self,
        owner: &str,
        request: &OrderRequest,
    ) -> Result<TransactionRequest, OrderFlowError> {
        let buyer_sku_code = request.buyer_sku_code.trim();
        if buyer_sku_code.is_empty() {
            return Err(OrderFlowError::Validation("A product (SKU) must be selected".to_string()));
        }
        if request.destination.trim().is_empty() {
            return Err(OrderFlowError::Validation("The destination number cannot be empty".to_string()));
        }
        let brand = self.resolve_brand(owner, buyer_sku_code, request.brand.as_deref()).await?;
        let customer_no = customer_number(Some(brand.as_str()), &request.destination, request.zone_id.as_deref())
            .ok_or_else(|| OrderFlowError::Validation("A zone id is required for this game".to_string()))?;
        let ref_id = match request.ref_id.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) if !is_valid_reference_id(r) => {
                return Err(OrderFlowError::Validation(format!("Invalid reference id: {r}")));
            },
            Some(r) => {
                if self.db.fetch_order_by_ref(r).await?.is_some() {
                    return Err(OrderFlowError::DuplicateReference(r.to_string()));
                }
                r.to_string()
            },
            None => generate_reference_id(),
        };
        Ok(TransactionRequest { buyer_sku_code: buyer_sku_code.to_string(), customer_no, ref_id })
    }

    async fn resolve_brand(
        &self,
        owner: &str,
        buyer_sku_code: &str,
        requested: Option<&str>,
    ) -> Result<String, OrderFlowError> {
        let catalog = self.db.fetch_catalog(owner).await?;
        if let Some(sku) = catalog.as_ref().and_then(|c| c.find_sku(buyer_sku_code)) {
            if requested.is_some_and(|b| !b.trim().eq_ignore_ascii_case(&sku.brand)) {
                debug!("🔄️ {buyer_sku_code} is listed under {}. Ignoring the brand given with the order", sku.brand);
            }
            return Ok(sku.brand.clone());
        }
        match requested.map(str::trim).filter(|b| !b.is_empty()) {
            Some(brand) => Ok(brand.to_string()),
            None => Err(OrderFlowError::Validation(format!(
                "{buyer_sku_code} is not in the catalog. Sync the price list or give the product's brand"
            ))),
        }
    }

    async fn call_order_placed_hook(&self, order: &OrderRecord) {
        for emitter in &self.producers.order_placed_producer {
            debug!("🔄️ Notifying order placed hook subscribers");
            emitter.publish_event(OrderPlacedEvent::new(order.clone())).await;
        }
    }

    async fn call_order_resolved_hook(&self, order: &OrderRecord, previous: Option<OrderState>) {
        for emitter in &self.producers.order_resolved_producer {
            debug!("🔄️ Notifying order resolved hook subscribers");
            emitter.publish_event(OrderResolvedEvent::new(order.clone(), previous)).await;
        }
    }
}

fn outcome_detail(status: OrderState, outcome: &OrderOutcomeFields) -> String {
    match status {
        OrderState::Success => format!("SN: {}", outcome.sn.as_deref().unwrap_or("-")),
        OrderState::Pending => format!("Status: {}", outcome.message.as_deref().unwrap_or("Pending")),
        OrderState::Failed => format!("Reason: {}", outcome.message.as_deref().unwrap_or("unknown")),
    }
}
