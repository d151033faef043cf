use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::ledger_service::{LedgerService, NewAccount};
use crate::domain::error::BankError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[post("/register")]
pub async fn register(
    service: web::Data<Arc<LedgerService>>,
    req: web::Json<NewAccount>,
) -> Result<HttpResponse, BankError> {
    let registration = service.register(req.into_inner())?;

    log::info!(
        "New account registered: number {}",
        registration.account_number
    );

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Account registered successfully",
        "userId": registration.account_id,
        "accountNumber": registration.account_number,
    })))
}

#[post("/login")]
pub async fn login(
    service: web::Data<Arc<LedgerService>>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, BankError> {
    let token = service.login(&req.username, &req.password)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
