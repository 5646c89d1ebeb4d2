use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::countries;

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub national_currency_name: String,
    pub national_currency_symbol: String,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCountry<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub national_currency_name: &'a str,
    pub national_currency_symbol: &'a str,
}

#[derive(Clone, Debug, AsChangeset)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CountryChanges<'a> {
    pub name: &'a str,
    pub national_currency_name: &'a str,
    pub national_currency_symbol: &'a str,
}
