use chrono::NaiveDate;
use diesel::{BoolExpressionMethods, ExpressionMethods, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::db::{DaoError, DbThreadPool};
use crate::models::transaction::Transaction;
use crate::schema::accounts as account_fields;
use crate::schema::accounts::dsl::accounts;
use crate::schema::transactions as transaction_fields;
use crate::schema::transactions::dsl::transactions;

pub struct Dao {
    db_thread_pool: DbThreadPool,
}

impl Dao {
    pub fn new(db_thread_pool: &DbThreadPool) -> Self {
        Self {
            db_thread_pool: db_thread_pool.clone(),
        }
    }

    /// Every transaction sent from or received by one of the user's accounts, newest first,
    /// optionally restricted to a single day.
    pub fn get_transactions_for_user(
        &self,
        user_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, DaoError> {
        let mut db_connection = self.db_thread_pool.get()?;

        let account_ids = accounts
            .select(account_fields::id)
            .filter(account_fields::user_id.eq(user_id))
            .load::<Uuid>(&mut db_connection)?;

        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = transactions
            .filter(
                transaction_fields::account_from_id
                    .eq_any(&account_ids)
                    .or(transaction_fields::account_to_id.eq_any(&account_ids)),
            )
            .into_boxed();

        if let Some(date) = date {
            query = query.filter(transaction_fields::date.eq(date));
        }

        Ok(query
            .order((transaction_fields::date.desc(), transaction_fields::id.desc()))
            .load::<Transaction>(&mut db_connection)?)
    }

    /// Transactions the user took no part in are reported as not found.
    pub fn get_transaction_for_user(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
    ) -> Result<Transaction, DaoError> {
        let mut db_connection = self.db_thread_pool.get()?;

        let transaction = transactions
            .find(transaction_id)
            .get_result::<Transaction>(&mut db_connection)?;

        let participants = [transaction.account_from_id, transaction.account_to_id]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let owned_count = accounts
            .filter(account_fields::id.eq_any(&participants))
            .filter(account_fields::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut db_connection)?;

        if owned_count == 0 {
            return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
        }

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Days, Utc};
    use diesel::dsl;
    use rust_decimal::Decimal;

    use crate::db::test_utils::{self, DB_THREAD_POOL};
    use crate::db::{account, transfer};
    use crate::models::user::UserType;

    #[test]
    fn test_get_transactions_for_user() {
        let alice = test_utils::insert_user(UserType::Regular);
        let bob = test_utils::insert_user(UserType::Regular);
        let carol = test_utils::insert_user(UserType::Regular);
        test_utils::insert_account(alice, Decimal::from(100));
        let bob_account = test_utils::insert_account(bob, Decimal::from(100));
        let carol_account = test_utils::insert_account(carol, Decimal::from(100));

        let transfer_dao = transfer::Dao::new(&DB_THREAD_POOL);
        let sent = transfer_dao
            .transfer(alice, &bob_account.number, Decimal::from(10), "Transfer")
            .unwrap();
        let received = transfer_dao
            .transfer(bob, &carol_account.number, Decimal::from(20), "Transfer")
            .unwrap();
        let unrelated = transfer_dao
            .transfer(carol, &bob_account.number, Decimal::from(5), "Transfer")
            .unwrap();

        let dao = Dao::new(&DB_THREAD_POOL);

        let alice_txs = dao.get_transactions_for_user(alice, None).unwrap();
        assert_eq!(alice_txs.len(), 1);
        assert_eq!(alice_txs[0].id, sent.id);

        let bob_txs = dao.get_transactions_for_user(bob, None).unwrap();
        assert_eq!(bob_txs.len(), 3);
        assert_eq!(bob_txs[0].id, unrelated.id);
        assert_eq!(bob_txs[1].id, received.id);
        assert_eq!(bob_txs[2].id, sent.id);

        let carol_txs = dao.get_transactions_for_user(carol, None).unwrap();
        assert_eq!(carol_txs.len(), 2);
        assert!(carol_txs.iter().all(|t| t.id != sent.id));

        let today = Utc::now().date_naive();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap();

        assert_eq!(
            dao.get_transactions_for_user(bob, Some(today)).unwrap().len(),
            3
        );
        assert!(dao
            .get_transactions_for_user(bob, Some(yesterday))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_get_transactions_for_user_without_accounts() {
        let user_id = test_utils::insert_user(UserType::Regular);
        let dao = Dao::new(&DB_THREAD_POOL);

        assert!(dao.get_transactions_for_user(user_id, None).unwrap().is_empty());
    }

    #[test]
    fn test_get_transaction_for_user() {
        let sender = test_utils::insert_user(UserType::Regular);
        let recipient = test_utils::insert_user(UserType::Regular);
        let outsider = test_utils::insert_user(UserType::Regular);
        test_utils::insert_account(sender, Decimal::from(50));
        let recipient_account = test_utils::insert_account(recipient, Decimal::ZERO);

        let transaction = transfer::Dao::new(&DB_THREAD_POOL)
            .transfer(sender, &recipient_account.number, Decimal::from(1), "Transfer")
            .unwrap();

        let dao = Dao::new(&DB_THREAD_POOL);

        assert_eq!(
            dao.get_transaction_for_user(transaction.id, sender).unwrap().id,
            transaction.id
        );
        assert_eq!(
            dao.get_transaction_for_user(transaction.id, recipient)
                .unwrap()
                .amount,
            Decimal::from(1)
        );
        assert!(dao
            .get_transaction_for_user(transaction.id, outsider)
            .unwrap_err()
            .is_not_found());
        assert!(dao
            .get_transaction_for_user(Uuid::now_v7(), sender)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_transaction_survives_account_deletion() {
        let sender = test_utils::insert_user(UserType::Regular);
        let recipient = test_utils::insert_user(UserType::Regular);
        let sender_account = test_utils::insert_account(sender, Decimal::from(50));
        let recipient_account = test_utils::insert_account(recipient, Decimal::ZERO);

        let transaction = transfer::Dao::new(&DB_THREAD_POOL)
            .transfer(sender, &recipient_account.number, Decimal::from(7), "Transfer")
            .unwrap();

        account::Dao::new(&DB_THREAD_POOL)
            .delete_account(sender_account.id, sender)
            .unwrap();

        let dao = Dao::new(&DB_THREAD_POOL);
        let loaded = dao
            .get_transaction_for_user(transaction.id, recipient)
            .unwrap();

        assert_eq!(loaded.account_from_id, None);
        assert_eq!(loaded.account_to_id, Some(recipient_account.id));
        assert!(dao.get_transactions_for_user(sender, None).unwrap().is_empty());

        let still_exists = dsl::select(dsl::exists(transactions.find(transaction.id)))
            .get_result::<bool>(&mut DB_THREAD_POOL.get().unwrap())
            .unwrap();
        assert!(still_exists);
    }
}
