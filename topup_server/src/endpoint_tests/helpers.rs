use actix_web::{
    body::{to_bytes, MessageBody},
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
    HttpResponse,
};
use chrono::Duration;
use digiflazz_tools::{DigiflazzConfig, NicknameApi};
use log::debug;
use serde_json::Value;
use topup_engine::{
    db_types::{NewMerchant, Role},
    events::EventProducers,
    test_utils::{prepare_env::prepare_test_db, scripted_vendor::ScriptedVendor},
    traits::VendorGateway,
    ActivityLogApi,
    CatalogApi,
    CredentialApi,
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    auth::{AdminCredentials, TokenIssuer, TokenVerifier, ACCESS_TOKEN_HEADER},
    config::{AdminConfig, AuthConfig},
    middleware::JwtAuthMiddlewareFactory,
    routes::{
        AllLogsRoute,
        AppendLogRoute,
        BalanceRoute,
        CheckIdRoute,
        CreateMerchantRoute,
        DeleteMerchantRoute,
        HistoryRoute,
        ListMerchantsRoute,
        LoginRoute,
        MyLogsRoute,
        OrderStatusRoute,
        PlaceOrderRoute,
        ProductsRoute,
        SyncPriceListRoute,
    },
    server::{json_config, query_config},
};

pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

// DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new("endpoint-tests-only-secret-0123456789abcdef", Duration::hours(1))
}

pub fn issue_token(username: &str, role: Role) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(username, role).expect("Failed to sign token")
}

/// A fresh database and scripted vendor for a single test.
pub struct TestContext {
    pub db: SqliteDatabase,
    pub vendor: ScriptedVendor,
    pub vendor_config: DigiflazzConfig,
    pub admin: AdminCredentials,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = env_logger::try_init();
        let db = prepare_test_db().await;
        let admin = AdminCredentials::from_config(&AdminConfig::new(ADMIN_USERNAME, ADMIN_PASSWORD), 4)
            .await
            .expect("Could not hash admin password");
        Self { db, vendor: ScriptedVendor::new(), vendor_config: DigiflazzConfig::default(), admin }
    }

    pub fn credential_api(&self) -> CredentialApi<SqliteDatabase> {
        CredentialApi::new(self.db.clone()).with_bcrypt_cost(4)
    }

    pub fn log_api(&self) -> ActivityLogApi<SqliteDatabase> {
        ActivityLogApi::new(self.db.clone())
    }

    pub async fn add_merchant(&self, username: &str, pin: &str) {
        let merchant = NewMerchant::new(username, "password", pin, "digi_user", "digi-key");
        self.credential_api().create_merchant(merchant).await.expect("Could not create merchant");
    }

    /// Sends `req` through an app wired like the real server, using the scripted vendor.
    pub async fn send(&self, req: TestRequest) -> (StatusCode, Value) {
        self.send_with(self.vendor.clone(), self.vendor.clone(), req).await
    }

    pub async fn send_with<V: VendorGateway + 'static>(
        &self,
        catalog_vendor: V,
        order_vendor: V,
        req: TestRequest,
    ) -> (StatusCode, Value) {
        let catalog_api = CatalogApi::new(self.db.clone(), catalog_vendor);
        let orders_api = OrderFlowApi::new(self.db.clone(), order_vendor, EventProducers::default());
        let nickname_api = NicknameApi::new(&self.vendor_config).expect("Could not create nickname client");
        let api_scope = web::scope("/api")
            .wrap(JwtAuthMiddlewareFactory::new(TokenVerifier::new(&get_auth_config())))
            .service(ListMerchantsRoute::<SqliteDatabase>::new())
            .service(CreateMerchantRoute::<SqliteDatabase>::new())
            .service(DeleteMerchantRoute::<SqliteDatabase>::new())
            .service(AllLogsRoute::<SqliteDatabase>::new())
            .service(BalanceRoute::<SqliteDatabase, V>::new())
            .service(SyncPriceListRoute::<SqliteDatabase, V>::new())
            .service(ProductsRoute::<SqliteDatabase, V>::new())
            .service(CheckIdRoute::new())
            .service(PlaceOrderRoute::<SqliteDatabase, V>::new())
            .service(OrderStatusRoute::<SqliteDatabase, V>::new())
            .service(HistoryRoute::<SqliteDatabase>::new())
            .service(MyLogsRoute::<SqliteDatabase>::new())
            .service(AppendLogRoute::<SqliteDatabase>::new());
        let app = App::new()
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(self.credential_api()))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(self.log_api()))
            .app_data(web::Data::new(nickname_api))
            .app_data(web::Data::new(self.admin.clone()))
            .app_data(web::Data::new(TokenIssuer::new(&get_auth_config())))
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(api_scope);
        let service = test::init_service(app).await;
        debug!("Making request");
        match test::try_call_service(&service, req.to_request()).await {
            Ok(res) => read_response(res.into_parts().1).await,
            Err(e) => read_response(e.error_response()).await,
        }
    }
}

async fn read_response<B: MessageBody>(res: HttpResponse<B>) -> (StatusCode, Value) {
    let status = res.status();
    let bytes = to_bytes(res.into_body()).await.unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn get(path: &str, token: &str) -> TestRequest {
    with_token(TestRequest::get().uri(path), token)
}

pub fn post(path: &str, token: &str, body: Value) -> TestRequest {
    with_token(TestRequest::post().uri(path).set_json(body), token)
}

pub fn delete(path: &str, token: &str) -> TestRequest {
    with_token(TestRequest::delete().uri(path), token)
}

fn with_token(req: TestRequest, token: &str) -> TestRequest {
    if token.is_empty() {
        req
    } else {
        req.insert_header((ACCESS_TOKEN_HEADER, token))
    }
}
