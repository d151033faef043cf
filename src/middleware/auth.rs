use actix_web::HttpRequest;

use crate::domain::auth::{AuthManager, Claims};
use crate::domain::error::{AuthError, BankError};

/// Extract and verify the bearer token from an incoming request.
///
/// Returns the verified claims (the principal) or an authentication error:
/// no `Authorization: Bearer <token>` header is 401, a bad token is 403.
pub fn authenticate(req: &HttpRequest, auth: &AuthManager) -> Result<Claims, BankError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(BankError::Auth(AuthError::MissingToken))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(BankError::Auth(AuthError::MissingToken))?;

    auth.verify_token(token)
}
