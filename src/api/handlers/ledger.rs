use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use crate::app::ledger_service::LedgerService;
use crate::domain::auth::AuthManager;
use crate::domain::error::BankError;
use crate::infrastructure::storage::file_storage::AccountStore;
use crate::middleware::auth::authenticate;

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub recipient_account_number: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[post("/deposit")]
pub async fn deposit(
    http_req: HttpRequest,
    auth: web::Data<Arc<AuthManager>>,
    service: web::Data<Arc<LedgerService>>,
    req: web::Json<DepositRequest>,
) -> Result<HttpResponse, BankError> {
    let claims = authenticate(&http_req, &auth)?;
    let new_balance = service.deposit(&claims.sub, req.amount)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Deposit of {} credited to {}", req.amount, claims.username),
        "newBalance": format!("{new_balance:.2}"),
    })))
}

#[post("/transfer")]
pub async fn transfer(
    http_req: HttpRequest,
    auth: web::Data<Arc<AuthManager>>,
    service: web::Data<Arc<LedgerService>>,
    req: web::Json<TransferRequest>,
) -> Result<HttpResponse, BankError> {
    let claims = authenticate(&http_req, &auth)?;
    let new_balance = service.transfer(&claims.sub, req.recipient_account_number, req.amount)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!(
            "Transfer of {} to account {} completed",
            req.amount, req.recipient_account_number
        ),
        "yourNewBalance": format!("{new_balance:.2}"),
    })))
}

#[get("/account")]
pub async fn account(
    http_req: HttpRequest,
    auth: web::Data<Arc<AuthManager>>,
    service: web::Data<Arc<LedgerService>>,
) -> Result<HttpResponse, BankError> {
    let claims = authenticate(&http_req, &auth)?;
    let summary = service.lookup(&claims.sub)?;

    Ok(HttpResponse::Ok().json(summary))
}

#[get("/protected")]
pub async fn protected(
    http_req: HttpRequest,
    auth: web::Data<Arc<AuthManager>>,
) -> Result<HttpResponse, BankError> {
    let claims = authenticate(&http_req, &auth)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome, {}! This is a protected route.", claims.username),
    })))
}

#[get("/health")]
pub async fn health(store: web::Data<Arc<AccountStore>>) -> impl Responder {
    let storage_ok = store.check_health();

    HttpResponse::Ok().json(serde_json::json!({
        "status": if storage_ok { "healthy" } else { "degraded" },
        "storage": storage_ok,
        "accounts": store.count(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "message": "FerroBank API is running",
    }))
}
