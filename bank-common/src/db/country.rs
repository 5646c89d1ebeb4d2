use diesel::{dsl, ExpressionMethods, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::db::{DaoError, DbThreadPool};
use crate::models::country::{Country, CountryChanges, NewCountry};
use crate::schema::countries as country_fields;
use crate::schema::countries::dsl::countries;
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

    pub fn get_all_countries(&self) -> Result<Vec<Country>, DaoError> {
        Ok(countries
            .order((country_fields::name.asc(), country_fields::id.asc()))
            .load::<Country>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn get_country(&self, country_id: Uuid) -> Result<Country, DaoError> {
        Ok(countries
            .find(country_id)
            .get_result::<Country>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn create_country(
        &self,
        name: &str,
        national_currency_name: &str,
        national_currency_symbol: &str,
    ) -> Result<Country, DaoError> {
        let new_country = NewCountry {
            id: Uuid::now_v7(),
            name,
            national_currency_name,
            national_currency_symbol,
        };

        Ok(dsl::insert_into(countries)
            .values(&new_country)
            .get_result::<Country>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn update_country(
        &self,
        country_id: Uuid,
        name: &str,
        national_currency_name: &str,
        national_currency_symbol: &str,
    ) -> Result<Country, DaoError> {
        Ok(dsl::update(countries.find(country_id))
            .set(&CountryChanges {
                name,
                national_currency_name,
                national_currency_symbol,
            })
            .get_result::<Country>(&mut self.db_thread_pool.get()?)?)
    }

    /// A country cannot be removed while any user lives in it.
    pub fn delete_country(&self, country_id: Uuid) -> Result<(), DaoError> {
        let mut db_connection = self.db_thread_pool.get()?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                let is_in_use = dsl::select(dsl::exists(
                    users.filter(user_fields::country_id.eq(country_id)),
                ))
                .get_result::<bool>(conn)?;

                if is_in_use {
                    return Err(DaoError::CannotRunQuery(
                        "Country is referenced by existing users",
                    ));
                }

                let deleted_count = diesel::delete(countries.find(country_id)).execute(conn)?;

                if deleted_count == 0 {
                    return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
                }

                Ok(())
            })
    }
}
