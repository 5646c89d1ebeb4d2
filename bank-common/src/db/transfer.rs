use chrono::Utc;
use diesel::{dsl, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use crate::db::category::get_or_create_category_by_name;
use crate::db::{DaoError, DbThreadPool};
use crate::models::account::Account;
use crate::models::category::CategoryType;
use crate::models::transaction::{NewTransaction, Transaction};
use crate::schema::accounts as account_fields;
use crate::schema::accounts::dsl::accounts;
use crate::schema::transactions::dsl::transactions;
use crate::validators::{self, Validity};

#[derive(Debug)]
pub enum TransferError {
    InvalidAccountNumber(String),
    InvalidAmount(String),
    NoSenderAccount,
    RecipientNotFound,
    SameAccount,
    InsufficientFunds,
    RecipientBalanceOverflow,
    Dao(DaoError),
}

impl std::error::Error for TransferError {}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::InvalidAccountNumber(msg) => {
                write!(f, "TransferError: Invalid account number: {msg}")
            }
            TransferError::InvalidAmount(msg) => write!(f, "TransferError: Invalid amount: {msg}"),
            TransferError::NoSenderAccount => write!(f, "TransferError: Sender has no account"),
            TransferError::RecipientNotFound => {
                write!(f, "TransferError: Recipient account does not exist")
            }
            TransferError::SameAccount => {
                write!(f, "TransferError: Sender and recipient are the same account")
            }
            TransferError::InsufficientFunds => write!(f, "TransferError: Insufficient funds"),
            TransferError::RecipientBalanceOverflow => write!(
                f,
                "TransferError: Recipient balance would exceed the storable maximum"
            ),
            TransferError::Dao(e) => write!(f, "TransferError: {e}"),
        }
    }
}

impl From<DaoError> for TransferError {
    fn from(error: DaoError) -> Self {
        TransferError::Dao(error)
    }
}

impl From<diesel::result::Error> for TransferError {
    fn from(error: diesel::result::Error) -> Self {
        TransferError::Dao(DaoError::from(error))
    }
}

impl From<r2d2::Error> for TransferError {
    fn from(error: r2d2::Error) -> Self {
        TransferError::Dao(DaoError::from(error))
    }
}

pub struct Dao {
    db_thread_pool: DbThreadPool,
}

impl Dao {
    pub fn new(db_thread_pool: &DbThreadPool) -> Self {
        Self {
            db_thread_pool: db_thread_pool.clone(),
        }
    }

    /// Moves `amount` from the sender's first account to the account numbered
    /// `recipient_account_number` and books the movement as a transaction.
    ///
    /// The debit, the credit and the transaction record are committed together. Both account
    /// rows are locked in id order before balances are read.
    pub fn transfer(
        &self,
        sender_user_id: Uuid,
        recipient_account_number: &str,
        amount: Decimal,
        default_category_name: &str,
    ) -> Result<Transaction, TransferError> {
        if let Validity::Invalid(msg) = validators::validate_account_number(recipient_account_number)
        {
            return Err(TransferError::InvalidAccountNumber(msg));
        }

        if let Validity::Invalid(msg) = validators::validate_amount(amount) {
            return Err(TransferError::InvalidAmount(msg));
        }

        let mut db_connection = self.db_thread_pool.get()?;

        db_connection
            .build_transaction()
            .run::<_, TransferError, _>(|conn| {
                let sender_id = accounts
                    .select(account_fields::id)
                    .filter(account_fields::user_id.eq(sender_user_id))
                    .order((
                        account_fields::created_timestamp.asc(),
                        account_fields::id.asc(),
                    ))
                    .first::<Uuid>(conn)
                    .optional()?
                    .ok_or(TransferError::NoSenderAccount)?;

                let recipient_id = accounts
                    .select(account_fields::id)
                    .filter(account_fields::number.eq(recipient_account_number))
                    .first::<Uuid>(conn)
                    .optional()?
                    .ok_or(TransferError::RecipientNotFound)?;

                if sender_id == recipient_id {
                    return Err(TransferError::SameAccount);
                }

                let locked = accounts
                    .filter(account_fields::id.eq_any([sender_id, recipient_id]))
                    .order(account_fields::id.asc())
                    .for_update()
                    .load::<Account>(conn)?;

                let mut sender = None;
                let mut recipient = None;

                for account in locked {
                    if account.id == sender_id {
                        sender = Some(account);
                    } else {
                        recipient = Some(account);
                    }
                }

                // Either row may have been deleted between the lookup and the lock
                let sender = sender.ok_or(TransferError::NoSenderAccount)?;
                let recipient = recipient.ok_or(TransferError::RecipientNotFound)?;

                if sender.balance < amount {
                    return Err(TransferError::InsufficientFunds);
                }

                let recipient_balance = recipient.balance + amount;

                if !validators::fits_numeric_column(recipient_balance) {
                    return Err(TransferError::RecipientBalanceOverflow);
                }

                dsl::update(accounts.find(sender.id))
                    .set(account_fields::balance.eq(sender.balance - amount))
                    .execute(conn)?;

                dsl::update(accounts.find(recipient.id))
                    .set(account_fields::balance.eq(recipient_balance))
                    .execute(conn)?;

                let category_id = match recipient.category_id {
                    Some(id) => id,
                    None => {
                        log::debug!(
                            "Recipient account {} has no category; booking under '{default_category_name}'",
                            recipient.id,
                        );

                        get_or_create_category_by_name(
                            conn,
                            default_category_name,
                            CategoryType::Expense,
                        )?
                        .id
                    }
                };

                let new_transaction = NewTransaction {
                    id: Uuid::now_v7(),
                    account_from_id: Some(sender.id),
                    account_to_id: Some(recipient.id),
                    amount,
                    date: Utc::now().date_naive(),
                    category_id,
                };

                Ok(dsl::insert_into(transactions)
                    .values(&new_transaction)
                    .get_result::<Transaction>(conn)?)
            })
    }
}
