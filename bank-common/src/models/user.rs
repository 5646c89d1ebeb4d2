use chrono::NaiveDate;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;

use crate::models::country::Country;
use crate::schema::users;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Regular,
    Entrepreneur,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Regular => "regular",
            UserType::Entrepreneur => "entrepreneur",
        }
    }
}

impl ToSql<Text, Pg> for UserType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for UserType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"regular" => Ok(UserType::Regular),
            b"entrepreneur" => Ok(UserType::Entrepreneur),
            _ => Err("Unrecognized user type".into()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Associations, Identifiable, Queryable)]
#[diesel(belongs_to(Country, foreign_key = country_id))]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub birthday: Option<NaiveDate>,
    pub date_of_joining: NaiveDate,
    pub country_id: Uuid,
    pub user_type: UserType,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub birthday: Option<NaiveDate>,
    pub date_of_joining: NaiveDate,
    pub country_id: Uuid,
    pub user_type: UserType,
}
