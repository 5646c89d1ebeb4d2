use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::category::CategoryType;
use crate::models::user::UserType;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputUser {
    pub birthday: Option<NaiveDate>,
    pub country_id: Uuid,
    #[serde(default = "default_user_type")]
    pub user_type: UserType,
}

fn default_user_type() -> UserType {
    UserType::Regular
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct InputAccount {
    pub category_id: Option<Uuid>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputCategory {
    pub name: String,
    pub category_type: CategoryType,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputCountry {
    pub name: String,
    pub national_currency_name: String,
    pub national_currency_symbol: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputMoneyTransfer {
    pub recipient_account_number: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct InputTransactionSearch {
    pub date: Option<NaiveDate>,
}
