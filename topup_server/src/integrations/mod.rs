pub mod digiflazz;
pub mod order_events;
