use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::account::Account;
use crate::models::transaction::Transaction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    IncorrectlyFormed,
    InvalidState,
    ConflictWithExisting,
    SameAccount,
    InsufficientFunds,

    IncorrectCredential,
    TokenExpired,
    TokenMissing,
    WrongTokenType,

    UserDisallowed,

    UserDoesNotExist,
    AccountDoesNotExist,
    CategoryDoesNotExist,
    CountryDoesNotExist,
    TransactionDoesNotExist,

    InputTooLarge,

    InternalError,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerErrorResponse {
    pub err_type: ErrorType,
    pub err_message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputDashboard {
    pub num_general_users: i64,
    pub num_entrepreneurs: i64,
    pub num_accounts: i64,
    pub num_transactions: i64,
    pub num_categories: i64,
    pub num_countries: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputBalance {
    pub total_balance: Decimal,
    pub accounts: Vec<Account>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputMoneyTransferForm {
    pub sender_account: Option<Account>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputTransactionList {
    pub date: Option<NaiveDate>,
    pub transactions: Vec<Transaction>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputHealth {
    pub database_reachable: bool,
    pub pool_connections: u32,
    pub pool_idle_connections: u32,
    pub pool_max_size: u32,
}
