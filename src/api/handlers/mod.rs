pub mod auth;
pub mod ledger;
