//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Everything here awaits: database calls, vendor calls and even the
//! bcrypt checks, which run on tokio's blocking pool.
//!
//! Every route under `/api` sits behind the access token middleware, so the caller's identity always comes from the
//! verified [`JwtClaims`], never from the request body.
use actix_web::{get, web, HttpResponse, Responder};
use digiflazz_tools::{NicknameApi, NicknameGame};
use log::*;
use serde_json::json;
use topup_engine::{
    db_types::{LogCategory, NewMerchant, Role},
    log_objects::{latest_by_reference, LogQuery},
    order_objects::OrderRequest,
    traits::{StorefrontDatabase, VendorGateway},
    ActivityLogApi,
    CatalogApi,
    CredentialApi,
    OrderFlowApi,
};

use crate::{
    auth::{AdminCredentials, JwtClaims, TokenIssuer},
    data_objects::{
        CatalogViewParams,
        CheckIdRequest,
        JsonResponse,
        LoginRequest,
        LoginResponse,
        LogRequest,
        MerchantLogParams,
        NicknameResult,
        StatusRequest,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
            impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+ where requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds >],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds >] >,)+ );}
        paste::paste! { impl< $( [< T $bounds >],)+ > [<$name:camel Route>]< $( [< T $bounds >],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds >] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds>],)+>
        where
            $([<T $bounds>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds >], )+>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds >],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds >] >,)+ );}
        paste::paste! { impl< $( [< T $bounds >],)+ > [<$name:camel Route>]< $( [< T $bounds >],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds >] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds>],)+>
        where
            $([<T $bounds>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(login => Post "/auth/login" impl StorefrontDatabase);
/// Route handler for the login endpoint
///
/// Takes `{username, password}` and, if they match the admin login or a merchant account, issues an access token
/// carrying the username and role. Both outcomes are recorded in the activity log under `auth`.
pub async fn login<B: StorefrontDatabase>(
    body: web::Json<LoginRequest>,
    credentials: web::Data<CredentialApi<B>>,
    logs: web::Data<ActivityLogApi<B>>,
    admin: web::Data<AdminCredentials>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let LoginRequest { username, password } = body.into_inner();
    let username = username.trim().to_string();
    trace!("💻️ Received login request for {username}");
    let result = if admin.is_admin(&username) {
        admin.verify(password.reveal()).await.map(|_| Role::Admin).map_err(ServerError::from)
    } else {
        credentials.authenticate(&username, password.reveal()).await.map(|_| Role::Merchant).map_err(ServerError::from)
    };
    let role = match result {
        Ok(role) => role,
        Err(e) => {
            info!("💻️ Failed login attempt for {username}. {e}");
            record_event(&logs, &username, LogCategory::Auth, &format!("Failed login attempt for {username}")).await;
            return Err(e);
        },
    };
    let token = signer.issue_token(&username, role)?;
    info!("💻️ {username} logged in as {role:?}");
    record_event(&logs, &username, LogCategory::Auth, &format!("{username} logged in")).await;
    let response = LoginResponse { token, username, role };
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(response).with_message("Login successful")))
}

/// Logging is best effort; a failure to write a log entry never fails the request.
async fn record_event<B: StorefrontDatabase>(
    logs: &ActivityLogApi<B>,
    owner: &str,
    category: LogCategory,
    message: &str,
) {
    if let Err(e) = logs.log_event(Some(owner), category, message).await {
        warn!("💻️ Could not write a {category:?} log entry for {owner}. {e}");
    }
}

//----------------------------------------------   Admin  ----------------------------------------------------
route!(list_merchants => Get "/admin/users" impl StorefrontDatabase where requires [Role::Admin]);
pub async fn list_merchants<B: StorefrontDatabase>(
    api: web::Data<CredentialApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET list_merchants");
    let merchants = api.list_merchants().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(merchants)))
}

route!(create_merchant => Post "/admin/users" impl StorefrontDatabase where requires [Role::Admin]);
/// Creates a merchant from `{username, password, pin, vendor_username, vendor_key}`. The password and PIN are
/// hashed before they are stored. Returns the public profile.
pub async fn create_merchant<B: StorefrontDatabase>(
    claims: JwtClaims,
    body: web::Json<NewMerchant>,
    api: web::Data<CredentialApi<B>>,
    logs: web::Data<ActivityLogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let merchant = body.into_inner();
    debug!("💻️ POST create_merchant for {}", merchant.username);
    let profile = api.create_merchant(merchant).await?;
    let message = format!("Merchant {} created by {}", profile.username, claims.sub);
    record_event(&logs, &claims.sub, LogCategory::System, &message).await;
    Ok(HttpResponse::Created().json(JsonResponse::with_data(profile).with_message(message)))
}

route!(delete_merchant => Delete "/admin/users/{id}" impl StorefrontDatabase where requires [Role::Admin]);
pub async fn delete_merchant<B: StorefrontDatabase>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CredentialApi<B>>,
    logs: web::Data<ActivityLogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE merchant #{id}");
    api.delete_merchant(id).await?;
    let message = format!("Merchant #{id} deleted by {}", claims.sub);
    record_event(&logs, &claims.sub, LogCategory::System, &message).await;
    Ok(HttpResponse::Ok().json(JsonResponse::success(message)))
}

route!(all_logs => Get "/admin/logs" impl StorefrontDatabase where requires [Role::Admin]);
/// The whole activity log, newest first. Accepts the `owner`, `category`, `ref_id` and `limit` query filters.
pub async fn all_logs<B: StorefrontDatabase>(
    query: web::Query<LogQuery>,
    api: web::Data<ActivityLogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all_logs with {:?}", query);
    let entries = api.fetch_logs(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(entries)))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(balance => Post "/balance" impl StorefrontDatabase, VendorGateway where requires [Role::Merchant]);
/// The merchant's deposit balance with the vendor.
pub async fn balance<B: StorefrontDatabase, V: VendorGateway>(
    claims: JwtClaims,
    api: web::Data<CatalogApi<B, V>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST balance for {}", claims.sub);
    let balance = api.balance(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(json!({ "deposit": balance }))))
}

route!(sync_price_list => Post "/pricelist" impl StorefrontDatabase, VendorGateway where requires [Role::Merchant]);
/// Fetches the vendor price list, stores the active SKUs as the merchant's catalog and returns them.
pub async fn sync_price_list<B: StorefrontDatabase, V: VendorGateway>(
    claims: JwtClaims,
    api: web::Data<CatalogApi<B, V>>,
    logs: web::Data<ActivityLogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST pricelist for {}", claims.sub);
    let catalog = api.sync_catalog(&claims.sub).await?;
    let message = format!("Catalog synced. {} products available", catalog.products.len());
    record_event(&logs, &claims.sub, LogCategory::System, &message).await;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(catalog.products).with_message(message)))
}

route!(products => Get "/products" impl StorefrontDatabase, VendorGateway where requires [Role::Merchant]);
/// The last catalog synced for the merchant, with its categories. `?category=` narrows it to that category's
/// brands, and `?category=&brand=` to the brand's products, cheapest first.
pub async fn products<B: StorefrontDatabase, V: VendorGateway>(
    claims: JwtClaims,
    params: web::Query<CatalogViewParams>,
    api: web::Data<CatalogApi<B, V>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET products for {}", claims.sub);
    let catalog = api.fetch_catalog(&claims.sub).await?;
    let view = params.view(&catalog)?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(view)))
}

route!(check_id => Post "/check-id" requires [Role::Merchant]);
/// Looks up a player's nickname, so the buyer can confirm the game account before paying.
pub async fn check_id(
    body: web::Json<CheckIdRequest>,
    api: web::Data<NicknameApi>,
) -> Result<HttpResponse, ServerError> {
    let CheckIdRequest { game, user_id, zone_id } = body.into_inner();
    let game = game.parse::<NicknameGame>()?;
    debug!("💻️ POST check-id for {game} player {user_id}");
    match api.lookup(game, user_id.trim(), zone_id.as_deref()).await? {
        Some(nickname) => Ok(HttpResponse::Ok().json(JsonResponse::with_data(NicknameResult { nickname }))),
        None => Err(ServerError::NoRecordFound(format!("No {game} player has the id {user_id}"))),
    }
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(place_order => Post "/transaction" impl StorefrontDatabase, VendorGateway where requires [Role::Merchant]);
/// Places an order for the merchant in the access token.
///
/// The reply carries the order's `status`: `SUCCESS`, `PENDING` (to be resolved by a status check or the
/// reconciliation worker) or `FAILED`. Orders refused before they reach the vendor (bad input, wrong PIN, duplicate
/// reference) are errors with `status: FAILED`.
pub async fn place_order<B: StorefrontDatabase, V: VendorGateway>(
    claims: JwtClaims,
    body: web::Json<OrderRequest>,
    api: web::Data<OrderFlowApi<B, V>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST transaction {} for {} by {}", request.buyer_sku_code, request.destination, claims.sub);
    let outcome = api.place_order(&claims.sub, request).await.map_err(ServerError::rejected_order)?;
    Ok(HttpResponse::Ok().json(JsonResponse::order(outcome)))
}

route!(order_status => Post "/status" impl StorefrontDatabase, VendorGateway where requires [Role::Merchant]);
/// Checks on one of the merchant's orders. Orders belonging to anybody else are reported as not found.
pub async fn order_status<B: StorefrontDatabase, V: VendorGateway>(
    claims: JwtClaims,
    body: web::Json<StatusRequest>,
    api: web::Data<OrderFlowApi<B, V>>,
) -> Result<HttpResponse, ServerError> {
    let StatusRequest { ref_id } = body.into_inner();
    debug!("💻️ POST status for {ref_id} by {}", claims.sub);
    let outcome = api.check_order_status(Some(&claims.sub), ref_id.trim()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::order(outcome)))
}

route!(history => Get "/history" impl StorefrontDatabase where requires [Role::Merchant]);
pub async fn history<B: StorefrontDatabase>(
    claims: JwtClaims,
    api: web::Data<ActivityLogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET history for {}", claims.sub);
    let orders = api.transaction_history(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(orders)))
}

//----------------------------------------------   Activity log  ----------------------------------------------------
route!(my_logs => Get "/logs" impl StorefrontDatabase where requires [Role::Merchant]);
pub async fn my_logs<B: StorefrontDatabase>(
    claims: JwtClaims,
    params: web::Query<MerchantLogParams>,
    api: web::Data<ActivityLogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET logs for {}", claims.sub);
    let params = params.into_inner();
    let latest = params.latest;
    let query = params.into_query(&claims.sub);
    let mut entries = api.fetch_logs(&query).await?;
    if latest {
        entries = latest_by_reference(&entries);
    }
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(entries)))
}

route!(append_log => Post "/log" impl StorefrontDatabase where requires [Role::Merchant]);
/// Appends `{type, message}` to the merchant's activity log.
pub async fn append_log<B: StorefrontDatabase>(
    claims: JwtClaims,
    body: web::Json<LogRequest>,
    api: web::Data<ActivityLogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let LogRequest { category, message } = body.into_inner();
    trace!("💻️ POST log ({category:?}) for {}", claims.sub);
    let entry = api.log_event(Some(&claims.sub), category, &message).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(entry)))
}
