use bank_common::db::{self, DaoError, DbThreadPool};
use bank_common::request_io::{InputTransactionSearch, OutputTransactionList};

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::middleware::auth::{Access, VerifiedToken};

pub async fn get_all(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
    search: web::Query<InputTransactionSearch>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;
    let date = search.date;

    let transactions = match web::block(move || {
        let transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions_for_user(user_id, date)
    })
    .await?
    {
        Ok(t) => t,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get transactions",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(OutputTransactionList { date, transactions }))
}

pub async fn get(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
    transaction_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;
    let transaction_id = transaction_id.into_inner();

    let transaction = match web::block(move || {
        let transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transaction_for_user(transaction_id, user_id)
    })
    .await?
    {
        Ok(t) => t,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("No transaction with ID matching request"),
                DoesNotExistType::Transaction,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get transaction",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(transaction))
}
