use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::app::ledger_service::NewAccount;
use crate::domain::error::{BankError, ValidationError};

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 64;
const PASSWORD_MIN_LEN: usize = 6;

/// Validate a registration request and parse its birth date.
///
/// All fields are required; this runs before any account data is touched.
pub fn validate_registration(input: &NewAccount) -> Result<NaiveDate, BankError> {
    require_field("username", &input.username)?;
    require_field("password", &input.password)?;
    require_field("fullName", &input.full_name)?;
    require_field("cpf", &input.cpf)?;
    require_field("birthDate", &input.birth_date)?;

    let username = input.username.trim();
    if username.len() < USERNAME_MIN_LEN || username.len() > USERNAME_MAX_LEN {
        return Err(BankError::Validation(ValidationError::InvalidField(
            format!("username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"),
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
    {
        return Err(BankError::Validation(ValidationError::InvalidField(
            "username may only contain letters, digits, '_', '.' and '-'".to_string(),
        )));
    }

    if input.password.len() < PASSWORD_MIN_LEN {
        return Err(BankError::Validation(ValidationError::InvalidField(
            format!("password must be at least {PASSWORD_MIN_LEN} characters"),
        )));
    }

    // CPF: 11 digits, punctuation allowed (e.g. 123.456.789-01)
    let cpf_digits: String = input.cpf.chars().filter(|c| c.is_ascii_digit()).collect();
    if cpf_digits.len() != 11 {
        return Err(BankError::Validation(ValidationError::InvalidField(
            "cpf must contain exactly 11 digits".to_string(),
        )));
    }

    NaiveDate::parse_from_str(input.birth_date.trim(), "%Y-%m-%d").map_err(|_| {
        BankError::Validation(ValidationError::InvalidField(
            "birthDate must be a valid date in YYYY-MM-DD format".to_string(),
        ))
    })
}

/// Deposit and transfer amounts must be strictly positive.
pub fn validate_amount(amount: Decimal) -> Result<(), BankError> {
    if amount <= Decimal::ZERO {
        return Err(BankError::Validation(ValidationError::InvalidAmount(
            "amount must be a positive number".to_string(),
        )));
    }
    Ok(())
}

fn require_field(name: &str, value: &str) -> Result<(), BankError> {
    if value.trim().is_empty() {
        return Err(BankError::Validation(ValidationError::MissingField(
            name.to_string(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewAccount {
        NewAccount {
            username: "maria.silva".to_string(),
            password: "hunter22".to_string(),
            full_name: "Maria Silva".to_string(),
            cpf: "123.456.789-01".to_string(),
            birth_date: "1990-04-12".to_string(),
        }
    }

    #[test]
    fn test_accepts_valid_registration() {
        let date = validate_registration(&valid_input()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 4, 12).unwrap());
    }

    #[test]
    fn test_rejects_empty_required_fields() {
        for field in ["username", "password", "fullName", "cpf", "birthDate"] {
            let mut input = valid_input();
            match field {
                "username" => input.username = "  ".to_string(),
                "password" => input.password = "".to_string(),
                "fullName" => input.full_name = "".to_string(),
                "cpf" => input.cpf = "".to_string(),
                _ => input.birth_date = "".to_string(),
            }

            match validate_registration(&input) {
                Err(BankError::Validation(ValidationError::MissingField(name))) => {
                    assert_eq!(name, field)
                }
                other => panic!("expected missing {field}, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_rejects_bad_cpf_and_birth_date() {
        let mut input = valid_input();
        input.cpf = "1234".to_string();
        assert!(validate_registration(&input).is_err());

        let mut input = valid_input();
        input.birth_date = "12/04/1990".to_string();
        assert!(validate_registration(&input).is_err());
    }

    #[test]
    fn test_rejects_username_with_invalid_characters() {
        let mut input = valid_input();
        input.username = "maria silva!".to_string();
        assert!(validate_registration(&input).is_err());
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(validate_amount("0.01".parse().unwrap()).is_ok());
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount("-5".parse().unwrap()).is_err());
    }
}
