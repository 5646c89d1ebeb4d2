use bank_common::db::transfer::TransferError;
use bank_common::db::{self, DbThreadPool};
use bank_common::request_io::{InputMoneyTransfer, OutputMoneyTransferForm};

use actix_web::{web, HttpResponse};

use crate::env;
use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::middleware::auth::{Access, VerifiedToken};

/// The account a transfer made now would be debited from, if the caller has one.
pub async fn form(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;

    let sender_account = match web::block(move || {
        let account_dao = db::account::Dao::new(&db_thread_pool);
        account_dao.get_first_account_for_user(user_id)
    })
    .await?
    {
        Ok(a) => a,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get sender account",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(OutputMoneyTransferForm { sender_account }))
}

pub async fn send(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
    money_transfer: web::Json<InputMoneyTransfer>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let InputMoneyTransfer {
        recipient_account_number,
        amount,
    } = money_transfer.into_inner();

    let user_id = user_access_token.claims.user_id;

    let transaction = match web::block(move || {
        let transfer_dao = db::transfer::Dao::new(&db_thread_pool);
        transfer_dao.transfer(
            user_id,
            &recipient_account_number,
            amount,
            &env::CONF.default_transfer_category,
        )
    })
    .await?
    {
        Ok(t) => t,
        Err(TransferError::InvalidAccountNumber(msg) | TransferError::InvalidAmount(msg)) => {
            return Err(HttpErrorResponse::IncorrectlyFormed(msg));
        }
        Err(TransferError::NoSenderAccount) => {
            return Err(HttpErrorResponse::InvalidState(String::from(
                "Open an account before sending money",
            )));
        }
        Err(TransferError::RecipientNotFound) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("No account with the recipient account number"),
                DoesNotExistType::Account,
            ));
        }
        Err(TransferError::SameAccount) => {
            return Err(HttpErrorResponse::SameAccount(String::from(
                "Cannot transfer money to the sending account",
            )));
        }
        Err(TransferError::InsufficientFunds) => {
            return Err(HttpErrorResponse::InsufficientFunds(String::from(
                "Sender balance is lower than the amount",
            )));
        }
        Err(TransferError::RecipientBalanceOverflow) => {
            return Err(HttpErrorResponse::InvalidState(String::from(
                "Recipient account cannot hold the resulting balance",
            )));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to transfer money",
            )));
        }
    };

    log::info!(
        "Transferred {} from account {:?} to account {:?} in transaction {}",
        transaction.amount,
        transaction.account_from_id,
        transaction.account_to_id,
        transaction.id,
    );

    Ok(HttpResponse::Created().json(transaction))
}
