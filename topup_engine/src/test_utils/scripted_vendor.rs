use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use crate::{
    db_types::{Rupiah, SkuEntry, VendorCredentials},
    traits::{TransactionReply, TransactionRequest, VendorError, VendorGateway},
};

type ScriptedReply = Result<TransactionReply, VendorError>;

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<ScriptedReply>>,
    calls: Vec<TransactionRequest>,
    price_list: Vec<SkuEntry>,
    balance: Rupiah,
}

/// An in-memory vendor that answers transactions from a per-reference script.
///
/// Replies for a reference id are consumed in order; the last one repeats forever. Unscripted references fail with
/// a transport error. Clones share the same script, so a test can keep a handle to inspect the calls.
#[derive(Clone, Default)]
pub struct ScriptedVendor {
    script: Arc<Mutex<Script>>,
}

impl ScriptedVendor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script<S: Into<String>>(&self, ref_id: S, reply: ScriptedReply) {
        if let Ok(mut script) = self.script.lock() {
            script.replies.entry(ref_id.into()).or_default().push_back(reply);
        }
    }

    pub fn set_price_list(&self, entries: Vec<SkuEntry>) {
        if let Ok(mut script) = self.script.lock() {
            script.price_list = entries;
        }
    }

    pub fn set_balance(&self, balance: Rupiah) {
        if let Ok(mut script) = self.script.lock() {
            script.balance = balance;
        }
    }

    pub fn calls(&self) -> Vec<TransactionRequest> {
        self.script.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().map(|s| s.calls.len()).unwrap_or_default()
    }
}

/// A reply with the given code and serial number, the way the vendor would send it.
pub fn vendor_reply(rc: &str, sn: Option<&str>, message: &str) -> TransactionReply {
    TransactionReply {
        rc: Some(rc.to_string()),
        sn: sn.map(String::from),
        status: Some(message.to_string()),
        message: Some(message.to_string()),
        price: None,
    }
}

impl VendorGateway for ScriptedVendor {
    async fn balance(&self, _credentials: &VendorCredentials) -> Result<Rupiah, VendorError> {
        self.script.lock().map(|s| s.balance).map_err(|e| VendorError::Transport(e.to_string()))
    }

    async fn price_list(&self, _credentials: &VendorCredentials) -> Result<Vec<SkuEntry>, VendorError> {
        self.script.lock().map(|s| s.price_list.clone()).map_err(|e| VendorError::Transport(e.to_string()))
    }

    async fn submit_transaction(
        &self,
        _credentials: &VendorCredentials,
        request: &TransactionRequest,
    ) -> Result<TransactionReply, VendorError> {
        let mut script = self.script.lock().map_err(|e| VendorError::Transport(e.to_string()))?;
        script.calls.push(request.clone());
        let Some(replies) = script.replies.get_mut(&request.ref_id) else {
            return Err(VendorError::Transport(format!("no scripted reply for {}", request.ref_id)));
        };
        let reply = if replies.len() > 1 { replies.pop_front() } else { replies.front().cloned() };
        reply.unwrap_or_else(|| Err(VendorError::Transport(format!("no scripted reply for {}", request.ref_id))))
    }
}
