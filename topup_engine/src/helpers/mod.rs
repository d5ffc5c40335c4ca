mod order_references;

pub use order_references::{customer_number, generate_reference_id, is_valid_reference_id, requires_zone_id};
