use bank_common::db::{self, DaoError, DbThreadPool};
use bank_common::request_io::InputUser;
use bank_common::validators::MAX_USERNAME_LENGTH;

use actix_web::{web, HttpResponse};

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::handlers::validation;
use crate::middleware::auth::{Access, VerifiedToken};

pub async fn create(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
    new_user: web::Json<InputUser>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let claims = user_access_token.claims;
    validation::check_name(&claims.username, "Username", MAX_USERNAME_LENGTH)?;

    let InputUser {
        birthday,
        country_id,
        user_type,
    } = new_user.into_inner();

    let user = match web::block(move || {
        let user_dao = db::user::Dao::new(&db_thread_pool);
        user_dao.create_user(
            claims.user_id,
            &claims.username,
            birthday,
            country_id,
            user_type,
        )
    })
    .await?
    {
        Ok(u) => u,
        Err(e) if e.is_unique_violation() => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(
                "A profile already exists for this user or username",
            )));
        }
        Err(e) if e.is_foreign_key_violation() => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("No country with ID matching request"),
                DoesNotExistType::Country,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to create user",
            )));
        }
    };

    log::info!("Registered profile for user {}", user.id);

    Ok(HttpResponse::Created().json(user))
}

pub async fn get_me(
    db_thread_pool: web::Data<DbThreadPool>,
    user_access_token: VerifiedToken<Access>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_id = user_access_token.claims.user_id;

    let user = match web::block(move || {
        let user_dao = db::user::Dao::new(&db_thread_pool);
        user_dao.get_user(user_id)
    })
    .await?
    {
        Ok(u) => u,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("No profile has been registered for this user"),
                DoesNotExistType::User,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get user",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(user))
}
