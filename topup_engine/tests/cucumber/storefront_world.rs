use std::fmt::Debug;

use cucumber::World;
use log::*;
use topup_engine::{
    events::EventProducers,
    order_objects::{OrderOutcome, ReconciliationResult},
    test_utils::{
        prepare_env::{create_database, random_db_path, run_migrations},
        scripted_vendor::ScriptedVendor,
    },
    ActivityLogApi,
    CredentialApi,
    CredentialError,
    OrderFlowApi,
    OrderFlowError,
    SqliteDatabase,
};

#[derive(Default, Debug, World)]
pub struct StorefrontWorld {
    pub system: Option<StorefrontSystem>,
    pub last_outcome: Option<Result<OrderOutcome, OrderFlowError>>,
    pub last_credential_error: Option<CredentialError>,
    pub last_reconciliation: Option<ReconciliationResult>,
}

pub struct StorefrontSystem {
    pub db_path: String,
    pub vendor: ScriptedVendor,
    pub credentials: CredentialApi<SqliteDatabase>,
    pub orders: OrderFlowApi<SqliteDatabase, ScriptedVendor>,
    pub logs: ActivityLogApi<SqliteDatabase>,
}

impl Debug for StorefrontSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorefrontSystem ({})", self.db_path)
    }
}

impl StorefrontWorld {
    pub async fn system(&mut self) -> &StorefrontSystem {
        if self.system.is_none() {
            self.system = Some(StorefrontSystem::new().await);
        }
        self.system.as_ref().expect("System not initialised")
    }
}

impl StorefrontSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        create_database(&url).await;
        run_migrations(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let vendor = ScriptedVendor::new();
        let credentials = CredentialApi::new(db.clone()).with_bcrypt_cost(4);
        let orders = OrderFlowApi::new(db.clone(), vendor.clone(), EventProducers::default());
        let logs = ActivityLogApi::new(db);
        Self { db_path: url, vendor, credentials, orders, logs }
    }
}
