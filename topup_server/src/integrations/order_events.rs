use log::*;
use topup_engine::events::{EventHandlers, EventHooks, OrderPlacedEvent, OrderResolvedEvent};

const ORDER_EVENT_BUFFER_SIZE: usize = 25;

/// The server's default event handlers. They report on order placements and resolutions in the log.
pub fn create_order_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_order_placed(|ev| {
        let OrderPlacedEvent { order } = ev;
        Box::pin(async move {
            info!(
                "📬️ Order {} placed by {}: {} for {}. Status: {}",
                order.ref_id, order.owner, order.buyer_sku_code, order.customer_no, order.status
            );
        })
    });
    hooks.on_order_resolved(|ev| {
        let OrderResolvedEvent { order, previous } = ev;
        Box::pin(async move {
            let previous = previous.map(|p| p.to_string()).unwrap_or_else(|| "new".to_string());
            info!(
                "📬️ Order {} for {} resolved. {previous} -> {}. SN: {}",
                order.ref_id,
                order.owner,
                order.status,
                order.sn.as_deref().unwrap_or("none")
            );
        })
    });
    EventHandlers::new(ORDER_EVENT_BUFFER_SIZE, hooks)
}
