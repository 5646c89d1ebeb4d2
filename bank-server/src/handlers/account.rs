use bank_common::db::account::AccountCreationError;
use bank_common::db::{self, DaoError, DbThreadPool};
use bank_common::request_io::{InputAccount, OutputBalance};

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::middleware::auth::{Access, VerifiedToken};

pub async fn my_balance(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;

    let accounts = match web::block(move || {
        let account_dao = db::account::Dao::new(&db_thread_pool);
        account_dao.get_accounts_for_user(user_id)
    })
    .await?
    {
        Ok(a) => a,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get accounts",
            )));
        }
    };

    let total_balance = accounts
        .iter()
        .fold(Decimal::ZERO, |total, account| total + account.balance);

    Ok(HttpResponse::Ok().json(OutputBalance {
        total_balance,
        accounts,
    }))
}

pub async fn create(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
    new_account: web::Json<InputAccount>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;
    let category_id = new_account.category_id;

    let account = match web::block(move || {
        let account_dao = db::account::Dao::new(&db_thread_pool);
        account_dao.create_account(user_id, category_id)
    })
    .await?
    {
        Ok(a) => a,
        Err(AccountCreationError::UserNotFound) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("Register a user profile before opening an account"),
                DoesNotExistType::User,
            ));
        }
        Err(AccountCreationError::CategoryNotAllowed) => {
            return Err(HttpErrorResponse::UserDisallowed(String::from(
                "Only entrepreneurs may assign a category to an account",
            )));
        }
        Err(AccountCreationError::CategoryNotFound) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("No category with ID matching request"),
                DoesNotExistType::Category,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to create account",
            )));
        }
    };

    log::info!("User {user_id} opened account {}", account.id);

    Ok(HttpResponse::Created().json(account))
}

pub async fn get(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
    account_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;
    let account_id = account_id.into_inner();

    let account = match web::block(move || {
        let account_dao = db::account::Dao::new(&db_thread_pool);
        account_dao.get_account_for_user(account_id, user_id)
    })
    .await?
    {
        Ok(a) => a,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("No account with ID matching request"),
                DoesNotExistType::Account,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get account",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(account))
}

pub async fn delete(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
    account_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;
    let account_id = account_id.into_inner();

    match web::block(move || {
        let account_dao = db::account::Dao::new(&db_thread_pool);
        account_dao.delete_account(account_id, user_id)
    })
    .await?
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("No account with ID matching request"),
                DoesNotExistType::Account,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to delete account",
            )));
        }
    };

    log::info!("User {user_id} deleted account {account_id}");

    Ok(HttpResponse::NoContent().finish())
}
