use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};

use crate::db::{DaoError, DbThreadPool};
use crate::models::user::UserType;
use crate::request_io::OutputDashboard;
use crate::schema::accounts::dsl::accounts;
use crate::schema::categories::dsl::categories;
use crate::schema::countries::dsl::countries;
use crate::schema::transactions::dsl::transactions;
use crate::schema::users as user_fields;
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

    /// Counts are read in one repeatable-read snapshot so they agree with each other.
    pub fn get_counts(&self) -> Result<OutputDashboard, DaoError> {
        let mut db_connection = self.db_thread_pool.get()?;

        db_connection
            .build_transaction()
            .repeatable_read()
            .read_only()
            .run::<_, DaoError, _>(|conn| {
                let num_general_users = users
                    .filter(user_fields::user_type.eq(UserType::Regular))
                    .count()
                    .get_result::<i64>(conn)?;

                let num_entrepreneurs = users
                    .filter(user_fields::user_type.eq(UserType::Entrepreneur))
                    .count()
                    .get_result::<i64>(conn)?;

                Ok(OutputDashboard {
                    num_general_users,
                    num_entrepreneurs,
                    num_accounts: accounts.count().get_result::<i64>(conn)?,
                    num_transactions: transactions.count().get_result::<i64>(conn)?,
                    num_categories: categories.count().get_result::<i64>(conn)?,
                    num_countries: countries.count().get_result::<i64>(conn)?,
                })
            })
    }
}
