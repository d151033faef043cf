use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::account::{
    Account, AccountSummary, ACCOUNT_NUMBER_MAX, ACCOUNT_NUMBER_MIN,
};
use crate::domain::auth::AuthManager;
use crate::domain::error::{AuthError, BankError, LedgerError, ValidationError};
use crate::infrastructure::storage::file_storage::AccountStore;
use crate::validators::request_validator::{validate_amount, validate_registration};

/// Registration input, one field per required item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub cpf: String,
    pub birth_date: String,
}

/// What registration hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub account_id: String,
    pub account_number: u32,
}

/// The ledger operations: registration, login, deposit, transfer, lookup.
///
/// Every mutation goes through `AccountStore::mutate`, which serializes
/// writers and persists atomically, so two concurrent transfers can never
/// both pass a stale balance check.
pub struct LedgerService {
    store: Arc<AccountStore>,
    auth: Arc<AuthManager>,
}

impl LedgerService {
    pub fn new(store: Arc<AccountStore>, auth: Arc<AuthManager>) -> Self {
        Self { store, auth }
    }

    /// Create a new account with a hashed password, a fresh 4-digit account
    /// number and a zero balance.
    pub fn register(&self, input: NewAccount) -> Result<Registration, BankError> {
        let birth_date = validate_registration(&input)?;

        self.store.mutate(|accounts| {
            if accounts.iter().any(|a| a.username == input.username.trim()) {
                return Err(BankError::Ledger(LedgerError::UsernameTaken(
                    input.username.trim().to_string(),
                )));
            }

            let password_hash = self.auth.hash_secret(&input.password)?;
            let account_number = allocate_account_number(accounts)?;

            let account = Account::new(
                input.username.trim().to_string(),
                password_hash,
                input.full_name.trim().to_string(),
                input.cpf.trim().to_string(),
                birth_date,
                account_number,
            );

            let registration = Registration {
                account_id: account.id.clone(),
                account_number,
            };
            accounts.push(account);

            info!(account_number, "account registered");
            Ok(registration)
        })
    }

    /// Verify credentials and issue a bearer token for the account.
    pub fn login(&self, username: &str, password: &str) -> Result<String, BankError> {
        let accounts = self.store.load_all();
        let account = accounts
            .iter()
            .find(|a| a.username == username)
            .ok_or(BankError::Auth(AuthError::InvalidCredentials))?;

        if !self.auth.verify_secret(password, &account.password_hash)? {
            warn!(username, "login attempt with bad credentials");
            return Err(BankError::Auth(AuthError::InvalidCredentials));
        }

        self.auth.issue_token(&account.id, &account.username)
    }

    /// Add a positive amount to the principal's balance. Not idempotent:
    /// submitting the same deposit twice credits it twice.
    pub fn deposit(&self, account_id: &str, amount: Decimal) -> Result<Decimal, BankError> {
        validate_amount(amount)?;

        self.store.mutate(|accounts| {
            let account = accounts
                .iter_mut()
                .find(|a| a.id == account_id)
                .ok_or_else(|| {
                    BankError::Ledger(LedgerError::AccountNotFound(account_id.to_string()))
                })?;

            // Checked arithmetic: an overflow must reject the request, not
            // panic while the store lock is held.
            account.balance = account.balance.checked_add(amount).ok_or_else(|| {
                BankError::Validation(ValidationError::InvalidAmount(
                    "deposit would overflow the balance".to_string(),
                ))
            })?;
            debug!(%amount, account_number = account.account_number, "deposit applied");
            Ok(account.balance)
        })
    }

    /// Move an amount from the principal to the account addressed by a
    /// public account number. Debit and credit land in the same save, so
    /// either both happen or neither does.
    pub fn transfer(
        &self,
        sender_id: &str,
        recipient_account_number: u32,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        validate_amount(amount)?;

        self.store.mutate(|accounts| {
            let sender_idx = accounts
                .iter()
                .position(|a| a.id == sender_id)
                .ok_or_else(|| {
                    BankError::Ledger(LedgerError::AccountNotFound(sender_id.to_string()))
                })?;
            let recipient_idx = accounts
                .iter()
                .position(|a| a.account_number == recipient_account_number)
                .ok_or(BankError::Ledger(LedgerError::RecipientNotFound(
                    recipient_account_number,
                )))?;

            if sender_idx == recipient_idx {
                return Err(BankError::Ledger(LedgerError::SelfTransfer));
            }
            if accounts[sender_idx].balance < amount {
                return Err(BankError::Ledger(LedgerError::InsufficientFunds));
            }

            // The debit cannot underflow past the balance check above, but
            // the credit can overflow; both stay checked so neither side is
            // touched unless both fit.
            let debited = accounts[sender_idx]
                .balance
                .checked_sub(amount)
                .ok_or(BankError::Ledger(LedgerError::InsufficientFunds))?;
            let credited = accounts[recipient_idx]
                .balance
                .checked_add(amount)
                .ok_or_else(|| {
                    BankError::Validation(ValidationError::InvalidAmount(
                        "transfer would overflow the recipient balance".to_string(),
                    ))
                })?;
            accounts[sender_idx].balance = debited;
            accounts[recipient_idx].balance = credited;

            info!(%amount, recipient_account_number, "transfer applied");
            Ok(accounts[sender_idx].balance)
        })
    }

    /// Balance and profile for the authenticated principal.
    pub fn lookup(&self, account_id: &str) -> Result<AccountSummary, BankError> {
        self.store
            .load_all()
            .iter()
            .find(|a| a.id == account_id)
            .map(Account::summary)
            .ok_or_else(|| BankError::Ledger(LedgerError::AccountNotFound(account_id.to_string())))
    }
}

/// Pick a free 4-digit account number.
///
/// Random draw with re-draw on collision; order among free numbers is not
/// specified. A full [1000, 9999] space is a hard failure, checked up front
/// so the draw loop always terminates.
pub fn allocate_account_number(accounts: &[Account]) -> Result<u32, BankError> {
    let space = (ACCOUNT_NUMBER_MAX - ACCOUNT_NUMBER_MIN + 1) as usize;
    if accounts.len() >= space {
        return Err(BankError::Ledger(LedgerError::AccountNumberSpaceExhausted));
    }

    let mut rng = rand::rng();
    loop {
        let candidate = rng.random_range(ACCOUNT_NUMBER_MIN..=ACCOUNT_NUMBER_MAX);
        if !accounts.iter().any(|a| a.account_number == candidate) {
            return Ok(candidate);
        }
    }
}
