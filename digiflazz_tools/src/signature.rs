use md5::{Digest, Md5};

/// The suffix mixed into a request signature. Each vendor endpoint expects a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureTag<'a> {
    Deposit,
    PriceList,
    Transaction(&'a str),
}

impl<'a> SignatureTag<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            SignatureTag::Deposit => "depo",
            SignatureTag::PriceList => "pricelist",
            SignatureTag::Transaction(ref_id) => ref_id,
        }
    }
}

/// Lowercase hex MD5 of `username + api_key + tag`.
pub fn sign(username: &str, api_key: &str, tag: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(username.as_bytes());
    hasher.update(api_key.as_bytes());
    hasher.update(tag.as_bytes());
    hex::encode(hasher.finalize())
}
