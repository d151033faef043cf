use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest and highest assignable public account numbers.
pub const ACCOUNT_NUMBER_MIN: u32 = 1000;
pub const ACCOUNT_NUMBER_MAX: u32 = 9999;

/// One persisted ledger account.
///
/// `id`, `username` and `account_number` are assigned at registration and
/// never change. `balance` is only touched by deposit and transfer.
/// Balances serialize as strings so the stored form round-trips exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub cpf: String,
    pub birth_date: NaiveDate,
    pub account_number: u32,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        username: String,
        password_hash: String,
        full_name: String,
        cpf: String,
        birth_date: NaiveDate,
        account_number: u32,
    ) -> Self {
        Account {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            full_name,
            cpf,
            birth_date,
            account_number,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Everything a caller may see about an account. The password hash
    /// stays inside the store.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            account_number: self.account_number,
            balance: self.balance,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            cpf: self.cpf.clone(),
            birth_date: self.birth_date,
            created_at: self.created_at,
        }
    }
}

/// Public view of an account, returned by the lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_number: u32,
    pub balance: Decimal,
    pub username: String,
    pub full_name: String,
    pub cpf: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account::new(
            "maria".to_string(),
            "$argon2id$fake-hash".to_string(),
            "Maria Silva".to_string(),
            "12345678901".to_string(),
            NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            4321,
        )
    }

    #[test]
    fn test_new_account_starts_with_zero_balance() {
        let account = sample_account();
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.account_number, 4321);
        assert!(!account.id.is_empty());
    }

    #[test]
    fn test_account_round_trips_through_json() {
        let mut account = sample_account();
        account.balance = "123.45".parse().unwrap();

        let json = serde_json::to_string(&account).unwrap();
        let restored: Account = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id, account.id);
        assert_eq!(restored.username, account.username);
        assert_eq!(restored.password_hash, account.password_hash);
        assert_eq!(restored.balance, account.balance);
        assert_eq!(restored.birth_date, account.birth_date);
        assert_eq!(restored.account_number, account.account_number);
    }

    #[test]
    fn test_summary_never_exposes_password_hash() {
        let account = sample_account();
        let json = serde_json::to_value(account.summary()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["accountNumber"], 4321);
    }
}
