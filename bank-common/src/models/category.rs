use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsChangeset, AsExpression, FromSqlRow, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;

use crate::schema::categories;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Expense,
    Income,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Expense => "expense",
            CategoryType::Income => "income",
        }
    }
}

impl ToSql<Text, Pg> for CategoryType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for CategoryType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"expense" => Ok(CategoryType::Expense),
            b"income" => Ok(CategoryType::Income),
            _ => Err("Unrecognized category type".into()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub category_type: CategoryType,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCategory<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub category_type: CategoryType,
}

#[derive(Clone, Debug, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryChanges<'a> {
    pub name: &'a str,
    pub category_type: CategoryType,
}
