pub mod account;
pub mod category;
pub mod country;
pub mod transaction;
pub mod user;
