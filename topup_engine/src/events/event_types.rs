use serde::Serialize;

use crate::db_types::{OrderRecord, OrderState};

/// An order was sent to the vendor and recorded, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPlacedEvent {
    pub order: OrderRecord,
}

impl OrderPlacedEvent {
    pub fn new(order: OrderRecord) -> Self {
        Self { order }
    }
}

/// An order reached a terminal state. `previous` is `None` when it was terminal straight away.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResolvedEvent {
    pub order: OrderRecord,
    pub previous: Option<OrderState>,
}

impl OrderResolvedEvent {
    pub fn new(order: OrderRecord, previous: Option<OrderState>) -> Self {
        Self { order, previous }
    }
}
