use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use std::fmt;
use std::time::Duration;

pub mod account;
pub mod category;
pub mod country;
pub mod dashboard;
pub mod health;
pub mod transaction;
pub mod transfer;
pub mod user;

pub type DbThreadPool = diesel::r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_db_thread_pool(
    database_uri: &str,
    max_db_connections: u32,
    idle_timeout: Duration,
) -> DbThreadPool {
    r2d2::Pool::builder()
        .max_size(max_db_connections)
        .idle_timeout(Some(idle_timeout))
        .build(ConnectionManager::<PgConnection>::new(database_uri))
        .expect("Failed to create DB thread pool")
}

#[derive(Debug)]
pub enum DaoError {
    DbThreadPoolFailure(r2d2::Error),
    QueryFailure(diesel::result::Error),
    CannotRunQuery(&'static str),
}

impl DaoError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DaoError::QueryFailure(diesel::result::Error::NotFound)
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            DaoError::QueryFailure(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _,
            ))
        )
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DaoError::QueryFailure(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}

impl std::error::Error for DaoError {}

impl fmt::Display for DaoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaoError::DbThreadPoolFailure(e) => {
                write!(f, "DaoError: Failed to obtain DB connection: {e}")
            }
            DaoError::QueryFailure(e) => {
                write!(f, "DaoError: Query failed: {e}")
            }
            DaoError::CannotRunQuery(msg) => {
                write!(f, "DaoError: Cannot run query: {msg}")
            }
        }
    }
}

impl From<r2d2::Error> for DaoError {
    fn from(error: r2d2::Error) -> Self {
        DaoError::DbThreadPoolFailure(error)
    }
}

impl From<diesel::result::Error> for DaoError {
    fn from(error: diesel::result::Error) -> Self {
        DaoError::QueryFailure(error)
    }
}

#[cfg(test)]
pub mod test_utils {
    use chrono::Utc;
    use diesel::{dsl, QueryDsl, RunQueryDsl};
    use once_cell::sync::Lazy;
    use rust_decimal::Decimal;
    use std::time::{Duration, SystemTime};
    use uuid::Uuid;

    use crate::db::{create_db_thread_pool, DbThreadPool};
    use crate::models::account::{Account, NewAccount};
    use crate::models::category::{CategoryType, NewCategory};
    use crate::models::country::NewCountry;
    use crate::models::user::{NewUser, UserType};
    use crate::schema::accounts::dsl::accounts;
    use crate::schema::categories::dsl::categories;
    use crate::schema::countries::dsl::countries;
    use crate::schema::users::dsl::users;
    use crate::threadrand::SecureRng;

    const DB_USERNAME_VAR: &str = "BANK_DB_USERNAME";
    const DB_PASSWORD_VAR: &str = "BANK_DB_PASSWORD";
    const DB_HOSTNAME_VAR: &str = "BANK_DB_HOSTNAME";
    const DB_PORT_VAR: &str = "BANK_DB_PORT";
    const DB_NAME_VAR: &str = "BANK_DB_NAME";
    const DB_MAX_CONNECTIONS_VAR: &str = "BANK_DB_MAX_CONNECTIONS";

    pub static DB_THREAD_POOL: Lazy<DbThreadPool> = Lazy::new(|| {
        let username = env_or_panic(DB_USERNAME_VAR);
        let password = env_or_panic(DB_PASSWORD_VAR);
        let hostname = env_or_panic(DB_HOSTNAME_VAR);
        let port = env_or_panic(DB_PORT_VAR);
        let db_name = env_or_panic(DB_NAME_VAR);

        let max_connections = env_or_parse(DB_MAX_CONNECTIONS_VAR, 48u32);

        let db_uri = format!(
            "postgres://{}:{}@{}:{}/{}",
            username, password, hostname, port, db_name
        );

        create_db_thread_pool(&db_uri, max_connections, Duration::from_secs(30))
    });

    pub fn unique_name(prefix: &str) -> String {
        format!("{prefix}-{}", SecureRng::next_u128())
    }

    pub fn insert_country() -> Uuid {
        let id = Uuid::now_v7();
        let name = unique_name("country");

        dsl::insert_into(countries)
            .values(&NewCountry {
                id,
                name: &name,
                national_currency_name: "Hryvnia",
                national_currency_symbol: "₴",
            })
            .execute(&mut DB_THREAD_POOL.get().unwrap())
            .expect("Failed to insert country");

        id
    }

    pub fn insert_category(category_type: CategoryType) -> Uuid {
        let id = Uuid::now_v7();
        let name = unique_name("category");

        dsl::insert_into(categories)
            .values(&NewCategory {
                id,
                name: &name,
                category_type,
            })
            .execute(&mut DB_THREAD_POOL.get().unwrap())
            .expect("Failed to insert category");

        id
    }

    pub fn insert_user(user_type: UserType) -> Uuid {
        let id = Uuid::now_v7();
        let username = unique_name("user");
        let country_id = insert_country();

        dsl::insert_into(users)
            .values(&NewUser {
                id,
                username: &username,
                birthday: None,
                date_of_joining: Utc::now().date_naive(),
                country_id,
                user_type,
            })
            .execute(&mut DB_THREAD_POOL.get().unwrap())
            .expect("Failed to insert user");

        id
    }

    /// Inserts an account directly so tests can start from a known balance.
    pub fn insert_account(user_id: Uuid, balance: Decimal) -> Account {
        let number = format!("{:016}", SecureRng::next_u64_below(10u64.pow(16)));

        dsl::insert_into(accounts)
            .values(&NewAccount {
                id: Uuid::now_v7(),
                number: &number,
                user_id,
                balance,
                category_id: None,
                created_timestamp: SystemTime::now(),
            })
            .get_result::<Account>(&mut DB_THREAD_POOL.get().unwrap())
            .expect("Failed to insert account")
    }

    pub fn get_account(account_id: Uuid) -> Account {
        accounts
            .find(account_id)
            .get_result::<Account>(&mut DB_THREAD_POOL.get().unwrap())
            .expect("Failed to load account")
    }

    fn env_or_panic(key: &str) -> String {
        std::env::var(key).unwrap_or_else(|_| panic!("Environment variable {key} must be set"))
    }

    fn env_or_parse<T>(key: &str, default: T) -> T
    where
        T: std::str::FromStr,
    {
        std::env::var(key)
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(default)
    }
}
