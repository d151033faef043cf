use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::account::Account;
use crate::domain::error::{BankError, StorageError};

/// File-backed account store.
///
/// The whole collection lives in `accounts.json` under the data directory and
/// is mirrored in memory behind one `Mutex`. Every mutation runs
/// load → mutate → persist while holding the lock, so writes are serialized
/// process-wide and a reader always sees either the previous or the next
/// complete collection, never a partial one.
pub struct AccountStore {
    data_dir: PathBuf,
    accounts: Mutex<Vec<Account>>,
}

impl AccountStore {
    /// Open the store, creating the data directory and an empty collection
    /// file if nothing exists yet.
    pub fn new(data_dir: &str) -> Result<Self, BankError> {
        fs::create_dir_all(data_dir)
            .map_err(|e| BankError::Storage(StorageError::Io(e.to_string())))?;

        let store = AccountStore {
            data_dir: PathBuf::from(data_dir),
            accounts: Mutex::new(Vec::new()),
        };

        let accounts = store.read_file()?;
        *store.accounts.lock().unwrap() = accounts;

        Ok(store)
    }

    fn accounts_file(&self) -> PathBuf {
        self.data_dir.join("accounts.json")
    }

    fn read_file(&self) -> Result<Vec<Account>, BankError> {
        let path = self.accounts_file();
        if !Path::new(&path).exists() {
            self.write_file(&[])?;
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&path)
            .map_err(|e| BankError::Storage(StorageError::Io(e.to_string())))?;
        let accounts: Vec<Account> = serde_json::from_str(&data)
            .map_err(|e| BankError::Storage(StorageError::Corrupt(e.to_string())))?;

        Ok(accounts)
    }

    /// Persist the full collection. Writes to a temp file first and renames
    /// it over the real one, so a crash mid-write cannot leave a torn file.
    fn write_file(&self, accounts: &[Account]) -> Result<(), BankError> {
        let data = serde_json::to_string_pretty(accounts)
            .map_err(|e| BankError::Storage(StorageError::Corrupt(e.to_string())))?;

        let tmp = self.data_dir.join("accounts.json.tmp");
        fs::write(&tmp, data).map_err(|e| BankError::Storage(StorageError::Io(e.to_string())))?;
        fs::rename(&tmp, self.accounts_file())
            .map_err(|e| BankError::Storage(StorageError::Io(e.to_string())))?;

        Ok(())
    }

    /// Consistent snapshot of every account.
    pub fn load_all(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }

    /// Run one mutation against the collection and persist the result.
    ///
    /// The closure works on a copy; if it fails, or the file write fails,
    /// the in-memory collection is left untouched and nothing is persisted.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Vec<Account>) -> Result<T, BankError>,
    ) -> Result<T, BankError> {
        let mut guard = self.accounts.lock().unwrap();

        let mut working = guard.clone();
        let result = f(&mut working)?;

        self.write_file(&working)?;
        *guard = working;

        Ok(result)
    }

    pub fn count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    /// Verify the data directory is still writable.
    pub fn check_health(&self) -> bool {
        let probe = self.data_dir.join("health_check.tmp");
        fs::write(&probe, "health_check").is_ok() && fs::remove_file(&probe).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn temp_data_dir() -> String {
        let dir = std::env::temp_dir().join(format!("ferrobank-store-{}", uuid::Uuid::new_v4()));
        dir.to_string_lossy().to_string()
    }

    fn account(username: &str, number: u32) -> Account {
        Account::new(
            username.to_string(),
            "$argon2id$fake".to_string(),
            "Test User".to_string(),
            "12345678901".to_string(),
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            number,
        )
    }

    #[test]
    fn test_open_without_backing_file_initializes_empty() {
        let dir = temp_data_dir();
        let store = AccountStore::new(&dir).unwrap();

        assert!(store.load_all().is_empty());
        assert!(Path::new(&dir).join("accounts.json").exists());
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = temp_data_dir();

        {
            let store = AccountStore::new(&dir).unwrap();
            store
                .mutate(|accounts| {
                    accounts.push(account("maria", 1234));
                    Ok(())
                })
                .unwrap();
        }

        let store = AccountStore::new(&dir).unwrap();
        let accounts = store.load_all();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "maria");
        assert_eq!(accounts[0].account_number, 1234);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = temp_data_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(Path::new(&dir).join("accounts.json"), "{not json").unwrap();

        match AccountStore::new(&dir) {
            Err(BankError::Storage(StorageError::Corrupt(_))) => {}
            other => panic!("expected corrupt-store error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_failed_mutation_changes_nothing() {
        let dir = temp_data_dir();
        let store = AccountStore::new(&dir).unwrap();
        store
            .mutate(|accounts| {
                accounts.push(account("maria", 1234));
                Ok(())
            })
            .unwrap();

        let result: Result<(), BankError> = store.mutate(|accounts| {
            accounts.clear();
            Err(BankError::Generic("abort".to_string()))
        });
        assert!(result.is_err());

        // In-memory and persisted state both keep the original account.
        assert_eq!(store.count(), 1);
        let reopened = AccountStore::new(&dir).unwrap();
        assert_eq!(reopened.count(), 1);
    }

    #[test]
    fn test_balances_round_trip_exactly() {
        let dir = temp_data_dir();
        let store = AccountStore::new(&dir).unwrap();

        store
            .mutate(|accounts| {
                let mut acc = account("maria", 1234);
                acc.balance = "0.10".parse::<Decimal>().unwrap()
                    + "0.20".parse::<Decimal>().unwrap();
                accounts.push(acc);
                Ok(())
            })
            .unwrap();

        let reopened = AccountStore::new(&dir).unwrap();
        assert_eq!(reopened.load_all()[0].balance, "0.30".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_check_health() {
        let dir = temp_data_dir();
        let store = AccountStore::new(&dir).unwrap();
        assert!(store.check_health());
    }
}
