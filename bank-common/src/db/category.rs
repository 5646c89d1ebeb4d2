use diesel::pg::PgConnection;
use diesel::{dsl, ExpressionMethods, OptionalExtension, QueryDsl, QueryResult, RunQueryDsl};
use uuid::Uuid;

use crate::db::{DaoError, DbThreadPool};
use crate::models::category::{Category, CategoryChanges, CategoryType, NewCategory};
use crate::schema::accounts as account_fields;
use crate::schema::accounts::dsl::accounts;
use crate::schema::categories as category_fields;
use crate::schema::categories::dsl::categories;
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

    pub fn get_all_categories(&self) -> Result<Vec<Category>, DaoError> {
        Ok(categories
            .order((category_fields::name.asc(), category_fields::id.asc()))
            .load::<Category>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn get_category(&self, category_id: Uuid) -> Result<Category, DaoError> {
        Ok(categories
            .find(category_id)
            .get_result::<Category>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn create_category(
        &self,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Category, DaoError> {
        let new_category = NewCategory {
            id: Uuid::now_v7(),
            name,
            category_type,
        };

        Ok(dsl::insert_into(categories)
            .values(&new_category)
            .get_result::<Category>(&mut self.db_thread_pool.get()?)?)
    }

    pub fn update_category(
        &self,
        category_id: Uuid,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Category, DaoError> {
        Ok(dsl::update(categories.find(category_id))
            .set(&CategoryChanges {
                name,
                category_type,
            })
            .get_result::<Category>(&mut self.db_thread_pool.get()?)?)
    }

    /// Refuses to delete a category that booked transactions still point at. Accounts tagged with
    /// the category simply lose the tag.
    pub fn delete_category(&self, category_id: Uuid) -> Result<(), DaoError> {
        let mut db_connection = self.db_thread_pool.get()?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                let is_in_use = dsl::select(dsl::exists(
                    transactions.filter(transaction_fields::category_id.eq(category_id)),
                ))
                .get_result::<bool>(conn)?;

                if is_in_use {
                    return Err(DaoError::CannotRunQuery(
                        "Category is referenced by existing transactions",
                    ));
                }

                dsl::update(accounts.filter(account_fields::category_id.eq(category_id)))
                    .set(account_fields::category_id.eq(None::<Uuid>))
                    .execute(conn)?;

                let deleted_count = diesel::delete(categories.find(category_id)).execute(conn)?;

                if deleted_count == 0 {
                    return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
                }

                Ok(())
            })
    }
}

/// Runs on the caller's connection so it can take part in an enclosing transaction.
pub(crate) fn get_or_create_category_by_name(
    conn: &mut PgConnection,
    name: &str,
    category_type: CategoryType,
) -> QueryResult<Category> {
    let existing = categories
        .filter(category_fields::name.eq(name))
        .order(category_fields::id.asc())
        .first::<Category>(conn)
        .optional()?;

    if let Some(category) = existing {
        return Ok(category);
    }

    dsl::insert_into(categories)
        .values(&NewCategory {
            id: Uuid::now_v7(),
            name,
            category_type,
        })
        .get_result::<Category>(conn)
}
