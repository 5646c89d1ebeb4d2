pub mod auth;

use bank_common::token::TokenError;

use actix_web::HttpRequest;

use crate::handlers::error::HttpErrorResponse;

#[inline]
fn get_header<'a>(req: &'a HttpRequest, key: &str) -> Option<&'a str> {
    let header = req.headers().get(key)?;
    header.to_str().ok()
}

#[inline(always)]
fn into_actix_error_res<T>(result: Result<T, TokenError>) -> Result<T, HttpErrorResponse> {
    result.map_err(HttpErrorResponse::from)
}
