use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AuthError, BankError};

/// JWT claims attached to every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Subject (account id)
    pub username: String, // Account username
    pub exp: i64,         // Expiration time
    pub iat: i64,         // Issued at
}

/// Credential hashing and token issuance.
///
/// Secrets are hashed with Argon2id; the plaintext never leaves this type.
/// Tokens are HS256 JWTs signed with the configured secret.
#[derive(Debug, Clone)]
pub struct AuthManager {
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthManager {
    pub fn new(jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_ttl_hours,
        }
    }

    /// Generate a secure JWT secret
    pub fn generate_jwt_secret() -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 64] = rng.random(); // 512-bit secret
        hex::encode(bytes)
    }

    /// Hash a secret with Argon2id, returning the PHC string form.
    pub fn hash_secret(&self, secret: &str) -> Result<String, BankError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| BankError::Auth(AuthError::Hashing(e.to_string())))?;
        Ok(hash.to_string())
    }

    /// Verify a secret against a stored hash. A wrong secret is `Ok(false)`;
    /// an unparseable hash is an error.
    pub fn verify_secret(&self, secret: &str, stored_hash: &str) -> Result<bool, BankError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| BankError::Auth(AuthError::Hashing(e.to_string())))?;

        match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(BankError::Auth(AuthError::Hashing(e.to_string()))),
        }
    }

    /// Issue a JWT for a verified account.
    pub fn issue_token(&self, account_id: &str, username: &str) -> Result<String, BankError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: account_id.to_string(),
            username: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| BankError::Auth(AuthError::InvalidToken(e.to_string())))
    }

    /// Verify a JWT and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, BankError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| BankError::Auth(AuthError::InvalidToken(e.to_string())))?;

        Ok(token_data.claims)
    }
}
