use std::{path::Path, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use digiflazz_tools::NicknameApi;
use log::*;
use topup_engine::{events::EventProducers, ActivityLogApi, CatalogApi, CredentialApi, OrderFlowApi, SqliteDatabase};

use crate::{
    auth::{AdminCredentials, TokenIssuer, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    integrations::{digiflazz::DigiflazzGateway, order_events::create_order_event_handlers},
    middleware::JwtAuthMiddlewareFactory,
    reconciliation_worker::start_reconciliation_worker,
    routes::{
        health,
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
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    ensure_database_dir(&config.database_url)?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Database migration failed. {e}")))?;
    let vendor = DigiflazzGateway::new(config.vendor.clone())?;
    let nickname = NicknameApi::new(&config.vendor)?;
    let admin = AdminCredentials::from_config(&config.admin, config.bcrypt_cost).await?;

    let handlers = create_order_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;

    if config.reconciliation.enabled {
        // The worker runs for the lifetime of the process
        let _ = start_reconciliation_worker(db.clone(), vendor.clone(), producers.clone(), config.reconciliation);
    }
    let srv = create_server_instance(config, db, vendor, nickname, admin, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    vendor: DigiflazzGateway,
    nickname: NicknameApi,
    admin: AdminCredentials,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let credential_api = CredentialApi::new(db.clone()).with_bcrypt_cost(config.bcrypt_cost);
        let catalog_api = CatalogApi::new(db.clone(), vendor.clone());
        let orders_api = OrderFlowApi::new(db.clone(), vendor.clone(), producers.clone());
        let log_api = ActivityLogApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let jwt_verifier = TokenVerifier::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("topup::access_log"))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(credential_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(log_api))
            .app_data(web::Data::new(nickname.clone()))
            .app_data(web::Data::new(admin.clone()))
            .app_data(web::Data::new(jwt_signer));
        // Routes that require authentication
        let api_scope = web::scope("/api")
            .wrap(JwtAuthMiddlewareFactory::new(jwt_verifier))
            .service(ListMerchantsRoute::<SqliteDatabase>::new())
            .service(CreateMerchantRoute::<SqliteDatabase>::new())
            .service(DeleteMerchantRoute::<SqliteDatabase>::new())
            .service(AllLogsRoute::<SqliteDatabase>::new())
            .service(BalanceRoute::<SqliteDatabase, DigiflazzGateway>::new())
            .service(SyncPriceListRoute::<SqliteDatabase, DigiflazzGateway>::new())
            .service(ProductsRoute::<SqliteDatabase, DigiflazzGateway>::new())
            .service(CheckIdRoute::new())
            .service(PlaceOrderRoute::<SqliteDatabase, DigiflazzGateway>::new())
            .service(OrderStatusRoute::<SqliteDatabase, DigiflazzGateway>::new())
            .service(HistoryRoute::<SqliteDatabase>::new())
            .service(MyLogsRoute::<SqliteDatabase>::new())
            .service(AppendLogRoute::<SqliteDatabase>::new());
        app.service(health).service(LoginRoute::<SqliteDatabase>::new()).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are answered with the usual `{success: false, message}` envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e, _req| ServerError::InvalidRequestBody(e.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|e, _req| ServerError::InvalidRequestBody(e.to_string()).into())
}

/// SQLite creates the database file but not the directory it lives in.
fn ensure_database_dir(url: &str) -> Result<(), ServerError> {
    let path = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            info!("🗃️ Creating database directory {}", dir.display());
            std::fs::create_dir_all(dir)?;
            Ok(())
        },
        _ => Ok(()),
    }
}
