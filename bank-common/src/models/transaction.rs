use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::category::Category;
use crate::schema::transactions;

#[derive(Clone, Debug, Serialize, Deserialize, Associations, Identifiable, Queryable)]
#[diesel(belongs_to(Category, foreign_key = category_id))]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Transaction {
    pub id: Uuid,
    pub account_from_id: Option<Uuid>,
    pub account_to_id: Option<Uuid>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Uuid,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTransaction {
    pub id: Uuid,
    pub account_from_id: Option<Uuid>,
    pub account_to_id: Option<Uuid>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Uuid,
}
