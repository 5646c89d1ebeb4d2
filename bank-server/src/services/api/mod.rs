use actix_web::error::JsonPayloadError;
use actix_web::web::*;
use actix_web::HttpRequest;

use crate::handlers::error::HttpErrorResponse;

mod account;
mod category;
mod country;
mod health;
mod index;
mod transaction;
mod transfer;
mod user;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(json_error_handler))
        .app_data(QueryConfig::default().error_handler(|err, _req| {
            HttpErrorResponse::IncorrectlyFormed(err.to_string()).into()
        }))
        .app_data(PathConfig::default().error_handler(|err, _req| {
            HttpErrorResponse::IncorrectlyFormed(err.to_string()).into()
        }));

    index::configure(cfg);
    transfer::configure(cfg);
    account::configure(cfg);
    category::configure(cfg);
    country::configure(cfg);
    transaction::configure(cfg);
    user::configure(cfg);
    health::configure(cfg);
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            HttpErrorResponse::InputTooLarge(err.to_string()).into()
        }
        _ => HttpErrorResponse::IncorrectlyFormed(err.to_string()).into(),
    }
}
