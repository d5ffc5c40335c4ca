use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;

const ZONE_BRANDS: [&str; 1] = ["MOBILE LEGENDS"];

const REFERENCE_PATTERN: &str = r"^[A-Za-z0-9_-]{1,64}$";

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference id pattern is a valid regex"))
}

/// A fresh reference id of the form `TRX-<unix millis>-<random hex>`.
pub fn generate_reference_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce = rand::random::<u32>();
    format!("TRX-{millis}-{nonce:08x}")
}

pub fn is_valid_reference_id(ref_id: &str) -> bool {
    reference_pattern().is_match(ref_id)
}

/// Brands whose player ids are only unique within a zone/server.
pub fn requires_zone_id(brand: &str) -> bool {
    ZONE_BRANDS.iter().any(|b| b.eq_ignore_ascii_case(brand.trim()))
}

/// Builds the vendor's customer number. For zoned brands the zone id is appended to the player id; `None` means a
/// required zone id was missing.
pub fn customer_number(brand: Option<&str>, destination: &str, zone_id: Option<&str>) -> Option<String> {
    let destination = destination.trim();
    let zone = zone_id.map(str::trim).filter(|z| !z.is_empty());
    match brand {
        Some(brand) if requires_zone_id(brand) => zone.map(|z| format!("{destination}{z}")),
        _ => Some(destination.to_string()),
    }
}
