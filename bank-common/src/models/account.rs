use diesel::{Identifiable, Insertable, Queryable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::models::user::User;
use crate::schema::accounts;

#[derive(Clone, Debug, Serialize, Deserialize, Associations, Identifiable, Queryable)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: Uuid,
    pub number: String,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub category_id: Option<Uuid>,
    pub created_timestamp: SystemTime,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount<'a> {
    pub id: Uuid,
    pub number: &'a str,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub category_id: Option<Uuid>,
    pub created_timestamp: SystemTime,
}
