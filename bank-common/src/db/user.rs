use chrono::{NaiveDate, Utc};
use diesel::{dsl, ExpressionMethods, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::db::{DaoError, DbThreadPool};
use crate::models::user::{NewUser, User, UserType};
use crate::schema::accounts as account_fields;
use crate::schema::accounts::dsl::accounts;
use crate::schema::transactions as transaction_fields;
use crate::schema::transactions::dsl::transactions;
use crate::schema::users::dsl::users;

pub struct Dao {
    db_thread_pool: DbThreadPool,
}

impl Dao {
    pub fn new(db_thread_pool: &DbThreadPool) -> Self {
        Self {
            db_thread_pool: db_thread_pool.clone(),
        }
    }

    /// The profile takes the id and username of the identity that owns it. The joining date is
    /// always today.
    pub fn create_user(
        &self,
        user_id: Uuid,
        username: &str,
        birthday: Option<NaiveDate>,
        country_id: Uuid,
        user_type: UserType,
    ) -> Result<User, DaoError> {
        let new_user = NewUser {
            id: user_id,
            username,
            birthday,
            date_of_joining: Utc::now().date_naive(),
            country_id,
            user_type,
        };

        Ok(dsl::insert_into(users)
            .values(&new_user)
            .get_result::<User>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn get_user(&self, user_id: Uuid) -> Result<User, DaoError> {
        Ok(users
            .find(user_id)
            .get_result::<User>(&mut self.db_thread_pool.get()?)?)
    }

    /// Removes the user along with every account they own. Transactions those accounts took part
    /// in are kept with the account references cleared.
    pub fn delete_user(&self, user_id: Uuid) -> Result<(), DaoError> {
        let mut db_connection = self.db_thread_pool.get()?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                let account_ids = accounts
                    .select(account_fields::id)
                    .filter(account_fields::user_id.eq(user_id))
                    .for_update()
                    .load::<Uuid>(conn)?;

                if !account_ids.is_empty() {
                    dsl::update(
                        transactions.filter(transaction_fields::account_from_id.eq_any(&account_ids)),
                    )
                    .set(transaction_fields::account_from_id.eq(None::<Uuid>))
                    .execute(conn)?;

                    dsl::update(
                        transactions.filter(transaction_fields::account_to_id.eq_any(&account_ids)),
                    )
                    .set(transaction_fields::account_to_id.eq(None::<Uuid>))
                    .execute(conn)?;

                    diesel::delete(accounts.filter(account_fields::id.eq_any(&account_ids)))
                        .execute(conn)?;
                }

                let deleted_count = diesel::delete(users.find(user_id)).execute(conn)?;

                if deleted_count == 0 {
                    return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
                }

                Ok(())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;

    use crate::db::test_utils::{self, DB_THREAD_POOL};
    use crate::db::transfer;

    #[test]
    fn test_create_and_get_user() {
        let dao = Dao::new(&DB_THREAD_POOL);
        let user_id = Uuid::now_v7();
        let username = test_utils::unique_name("olena");
        let country_id = test_utils::insert_country();
        let birthday = NaiveDate::from_ymd_opt(1994, 8, 24).unwrap();

        let user = dao
            .create_user(
                user_id,
                &username,
                Some(birthday),
                country_id,
                UserType::Entrepreneur,
            )
            .unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.username, username);
        assert_eq!(user.birthday, Some(birthday));
        assert_eq!(user.date_of_joining, Utc::now().date_naive());
        assert_eq!(user.country_id, country_id);
        assert_eq!(user.user_type, UserType::Entrepreneur);

        let loaded = dao.get_user(user_id).unwrap();
        assert_eq!(loaded.username, username);
        assert_eq!(loaded.user_type, UserType::Entrepreneur);

        assert!(dao.get_user(Uuid::now_v7()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_user_with_missing_country() {
        let dao = Dao::new(&DB_THREAD_POOL);

        let result = dao.create_user(
            Uuid::now_v7(),
            &test_utils::unique_name("taras"),
            None,
            Uuid::now_v7(),
            UserType::Regular,
        );

        assert!(result.unwrap_err().is_foreign_key_violation());
    }

    #[test]
    fn test_create_duplicate_user() {
        let dao = Dao::new(&DB_THREAD_POOL);
        let user_id = Uuid::now_v7();
        let username = test_utils::unique_name("ivan");
        let country_id = test_utils::insert_country();

        dao.create_user(user_id, &username, None, country_id, UserType::Regular)
            .unwrap();

        assert!(dao
            .create_user(user_id, &test_utils::unique_name("ivan"), None, country_id, UserType::Regular)
            .unwrap_err()
            .is_unique_violation());

        assert!(dao
            .create_user(Uuid::now_v7(), &username, None, country_id, UserType::Regular)
            .unwrap_err()
            .is_unique_violation());
    }

    #[test]
    fn test_delete_user() {
        let dao = Dao::new(&DB_THREAD_POOL);
        let user_id = test_utils::insert_user(UserType::Regular);
        let other_id = test_utils::insert_user(UserType::Regular);
        let account = test_utils::insert_account(user_id, Decimal::from(10));
        let other_account = test_utils::insert_account(other_id, Decimal::ZERO);

        let transaction = transfer::Dao::new(&DB_THREAD_POOL)
            .transfer(user_id, &other_account.number, Decimal::from(4), "Transfer")
            .unwrap();

        dao.delete_user(user_id).unwrap();

        assert!(dao.get_user(user_id).unwrap_err().is_not_found());
        assert!(dao.delete_user(user_id).unwrap_err().is_not_found());

        let account_exists = dsl::select(dsl::exists(accounts.find(account.id)))
            .get_result::<bool>(&mut DB_THREAD_POOL.get().unwrap())
            .unwrap();
        assert!(!account_exists);

        let account_from_id = transactions
            .find(transaction.id)
            .select(transaction_fields::account_from_id)
            .get_result::<Option<Uuid>>(&mut DB_THREAD_POOL.get().unwrap())
            .unwrap();
        assert_eq!(account_from_id, None);

        assert_eq!(
            test_utils::get_account(other_account.id).balance,
            Decimal::from(4)
        );
    }
}
