use diesel::{dsl, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use rust_decimal::Decimal;
use std::fmt;
use std::time::SystemTime;
use uuid::Uuid;

use crate::db::{DaoError, DbThreadPool};
use crate::models::account::{Account, NewAccount};
use crate::models::user::UserType;
use crate::schema::accounts as account_fields;
use crate::schema::accounts::dsl::accounts;
use crate::schema::categories::dsl::categories;
use crate::schema::transactions as transaction_fields;
use crate::schema::transactions::dsl::transactions;
use crate::schema::users as user_fields;
use crate::schema::users::dsl::users;
use crate::threadrand::SecureRng;
use crate::validators::ACCOUNT_NUMBER_LENGTH;

const ACCOUNT_NUMBER_SPACE: u64 = 10u64.pow(ACCOUNT_NUMBER_LENGTH as u32);
const MAX_ACCOUNT_NUMBER_ATTEMPTS: usize = 32;

/// Generates a uniformly random, zero-padded 16-digit account number.
pub fn generate_account_number() -> String {
    format!(
        "{:0width$}",
        SecureRng::next_u64_below(ACCOUNT_NUMBER_SPACE),
        width = ACCOUNT_NUMBER_LENGTH,
    )
}

#[derive(Debug)]
pub enum AccountCreationError {
    UserNotFound,
    CategoryNotAllowed,
    CategoryNotFound,
    NumberSpaceExhausted,
    Dao(DaoError),
}

impl std::error::Error for AccountCreationError {}

impl fmt::Display for AccountCreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountCreationError::UserNotFound => write!(f, "AccountCreationError: User not found"),
            AccountCreationError::CategoryNotAllowed => write!(
                f,
                "AccountCreationError: Only entrepreneurs may categorize accounts"
            ),
            AccountCreationError::CategoryNotFound => {
                write!(f, "AccountCreationError: Category not found")
            }
            AccountCreationError::NumberSpaceExhausted => write!(
                f,
                "AccountCreationError: Failed to find an unused account number"
            ),
            AccountCreationError::Dao(e) => write!(f, "AccountCreationError: {e}"),
        }
    }
}

impl From<DaoError> for AccountCreationError {
    fn from(error: DaoError) -> Self {
        AccountCreationError::Dao(error)
    }
}

impl From<diesel::result::Error> for AccountCreationError {
    fn from(error: diesel::result::Error) -> Self {
        AccountCreationError::Dao(DaoError::from(error))
    }
}

impl From<r2d2::Error> for AccountCreationError {
    fn from(error: r2d2::Error) -> Self {
        AccountCreationError::Dao(DaoError::from(error))
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

    /// Oldest first. The first account is the one transfers are sent from.
    pub fn get_accounts_for_user(&self, user_id: Uuid) -> Result<Vec<Account>, DaoError> {
        Ok(accounts
            .filter(account_fields::user_id.eq(user_id))
            .order((
                account_fields::created_timestamp.asc(),
                account_fields::id.asc(),
            ))
            .load::<Account>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn get_first_account_for_user(&self, user_id: Uuid) -> Result<Option<Account>, DaoError> {
        Ok(accounts
            .filter(account_fields::user_id.eq(user_id))
            .order((
                account_fields::created_timestamp.asc(),
                account_fields::id.asc(),
            ))
            .first::<Account>(&mut self.db_thread_pool.get()?)
            .optional()?)
    }

    pub fn get_account_for_user(&self, account_id: Uuid, user_id: Uuid) -> Result<Account, DaoError> {
        Ok(accounts
            .find(account_id)
            .filter(account_fields::user_id.eq(user_id))
            .get_result::<Account>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn create_account(
        &self,
        user_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Account, AccountCreationError> {
        let mut db_connection = self.db_thread_pool.get()?;

        db_connection
            .build_transaction()
            .run::<_, AccountCreationError, _>(|conn| {
                let user_type = users
                    .find(user_id)
                    .select(user_fields::user_type)
                    .get_result::<UserType>(conn)
                    .optional()?
                    .ok_or(AccountCreationError::UserNotFound)?;

                if let Some(category_id) = category_id {
                    if user_type != UserType::Entrepreneur {
                        return Err(AccountCreationError::CategoryNotAllowed);
                    }

                    let category_exists =
                        dsl::select(dsl::exists(categories.find(category_id))).get_result::<bool>(conn)?;

                    if !category_exists {
                        return Err(AccountCreationError::CategoryNotFound);
                    }
                }

                let mut number = None;

                for _ in 0..MAX_ACCOUNT_NUMBER_ATTEMPTS {
                    let candidate = generate_account_number();
                    let is_taken = dsl::select(dsl::exists(
                        accounts.filter(account_fields::number.eq(&candidate)),
                    ))
                    .get_result::<bool>(conn)?;

                    if !is_taken {
                        number = Some(candidate);
                        break;
                    }

                    log::warn!("Generated account number collided with an existing account");
                }

                let Some(number) = number else {
                    log::error!(
                        "No unused account number found after {MAX_ACCOUNT_NUMBER_ATTEMPTS} attempts"
                    );
                    return Err(AccountCreationError::NumberSpaceExhausted);
                };

                let new_account = NewAccount {
                    id: Uuid::now_v7(),
                    number: &number,
                    user_id,
                    balance: Decimal::ZERO,
                    category_id,
                    created_timestamp: SystemTime::now(),
                };

                Ok(dsl::insert_into(accounts)
                    .values(&new_account)
                    .get_result::<Account>(conn)?)
            })
    }

    /// Transactions that referenced the account keep their history with the reference cleared.
    pub fn delete_account(&self, account_id: Uuid, user_id: Uuid) -> Result<(), DaoError> {
        let mut db_connection = self.db_thread_pool.get()?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                let account_id = accounts
                    .find(account_id)
                    .select(account_fields::id)
                    .filter(account_fields::user_id.eq(user_id))
                    .for_update()
                    .get_result::<Uuid>(conn)?;

                dsl::update(transactions.filter(transaction_fields::account_from_id.eq(account_id)))
                    .set(transaction_fields::account_from_id.eq(None::<Uuid>))
                    .execute(conn)?;

                dsl::update(transactions.filter(transaction_fields::account_to_id.eq(account_id)))
                    .set(transaction_fields::account_to_id.eq(None::<Uuid>))
                    .execute(conn)?;

                diesel::delete(accounts.find(account_id)).execute(conn)?;

                Ok(())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::str::FromStr;

    use crate::db::test_utils::{self, DB_THREAD_POOL};
    use crate::models::category::CategoryType;
    use crate::validators::{self, Validity};

    #[test]
    fn test_generate_account_number() {
        let mut numbers = HashSet::new();

        for _ in 0..500 {
            let number = generate_account_number();

            assert!(matches!(
                validators::validate_account_number(&number),
                Validity::Valid
            ));

            numbers.insert(number);
        }

        assert!(numbers.len() > 495);
    }

    #[test]
    fn test_create_account() {
        let user_id = test_utils::insert_user(UserType::Regular);
        let dao = Dao::new(&DB_THREAD_POOL);

        let account = dao.create_account(user_id, None).unwrap();

        assert_eq!(account.user_id, user_id);
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.category_id, None);
        assert!(validators::validate_account_number(&account.number).is_valid());

        let second = dao.create_account(user_id, None).unwrap();
        assert_ne!(account.number, second.number);

        let loaded = dao.get_accounts_for_user(user_id).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, account.id);
        assert_eq!(loaded[1].id, second.id);

        let first = dao.get_first_account_for_user(user_id).unwrap().unwrap();
        assert_eq!(first.id, account.id);
    }

    #[test]
    fn test_create_account_with_category() {
        let regular_user_id = test_utils::insert_user(UserType::Regular);
        let entrepreneur_id = test_utils::insert_user(UserType::Entrepreneur);
        let category_id = test_utils::insert_category(CategoryType::Income);
        let dao = Dao::new(&DB_THREAD_POOL);

        assert!(matches!(
            dao.create_account(regular_user_id, Some(category_id)),
            Err(AccountCreationError::CategoryNotAllowed)
        ));
        assert!(dao.get_accounts_for_user(regular_user_id).unwrap().is_empty());

        assert!(matches!(
            dao.create_account(entrepreneur_id, Some(Uuid::now_v7())),
            Err(AccountCreationError::CategoryNotFound)
        ));

        let account = dao.create_account(entrepreneur_id, Some(category_id)).unwrap();
        assert_eq!(account.category_id, Some(category_id));
    }

    #[test]
    fn test_create_account_for_missing_user() {
        let dao = Dao::new(&DB_THREAD_POOL);

        assert!(matches!(
            dao.create_account(Uuid::now_v7(), None),
            Err(AccountCreationError::UserNotFound)
        ));
    }

    #[test]
    fn test_get_account_for_user() {
        let owner_id = test_utils::insert_user(UserType::Regular);
        let other_id = test_utils::insert_user(UserType::Regular);
        let account = test_utils::insert_account(owner_id, Decimal::from_str("12.50").unwrap());
        let dao = Dao::new(&DB_THREAD_POOL);

        let loaded = dao.get_account_for_user(account.id, owner_id).unwrap();
        assert_eq!(loaded.balance, Decimal::from_str("12.50").unwrap());

        assert!(dao
            .get_account_for_user(account.id, other_id)
            .unwrap_err()
            .is_not_found());
        assert!(dao.get_first_account_for_user(other_id).unwrap().is_none());
    }

    #[test]
    fn test_delete_account() {
        let owner_id = test_utils::insert_user(UserType::Regular);
        let other_id = test_utils::insert_user(UserType::Regular);
        let account = test_utils::insert_account(owner_id, Decimal::ZERO);
        let dao = Dao::new(&DB_THREAD_POOL);

        assert!(dao
            .delete_account(account.id, other_id)
            .unwrap_err()
            .is_not_found());
        dao.get_account_for_user(account.id, owner_id).unwrap();

        dao.delete_account(account.id, owner_id).unwrap();
        assert!(dao
            .get_account_for_user(account.id, owner_id)
            .unwrap_err()
            .is_not_found());
    }
}
