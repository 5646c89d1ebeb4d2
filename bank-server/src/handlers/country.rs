use bank_common::db::{self, DaoError, DbThreadPool};
use bank_common::request_io::InputCountry;
use bank_common::validators::{self, MAX_COUNTRY_NAME_LENGTH, MAX_CURRENCY_NAME_LENGTH};

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::handlers::validation;
use crate::middleware::auth::{Access, AdminToken, VerifiedToken};

const COUNTRY_NOT_FOUND_MSG: &str = "No country with ID matching request";

fn validate_country(country: &InputCountry) -> Result<(), HttpErrorResponse> {
    validation::check_name(&country.name, "Country name", MAX_COUNTRY_NAME_LENGTH)?;
    validation::check_name(
        &country.national_currency_name,
        "Currency name",
        MAX_CURRENCY_NAME_LENGTH,
    )?;
    validation::check(validators::validate_currency_symbol(
        &country.national_currency_symbol,
    ))
}

pub async fn get_all(
    db_thread_pool: web::Data<DbThreadPool>,
    _user_access_token: VerifiedToken<Access>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let countries = match web::block(move || {
        let country_dao = db::country::Dao::new(&db_thread_pool);
        country_dao.get_all_countries()
    })
    .await?
    {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get countries",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(countries))
}

pub async fn get(
    db_thread_pool: web::Data<DbThreadPool>,
    _user_access_token: VerifiedToken<Access>,
    country_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let country_id = country_id.into_inner();

    let country = match web::block(move || {
        let country_dao = db::country::Dao::new(&db_thread_pool);
        country_dao.get_country(country_id)
    })
    .await?
    {
        Ok(c) => c,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(COUNTRY_NOT_FOUND_MSG),
                DoesNotExistType::Country,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get country",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(country))
}

pub async fn create(
    db_thread_pool: web::Data<DbThreadPool>,
    _admin_token: AdminToken,
    new_country: web::Json<InputCountry>,
) -> Result<HttpResponse, HttpErrorResponse> {
    validate_country(&new_country)?;

    let country = match web::block(move || {
        let country_dao = db::country::Dao::new(&db_thread_pool);
        country_dao.create_country(
            &new_country.name,
            &new_country.national_currency_name,
            &new_country.national_currency_symbol,
        )
    })
    .await?
    {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to create country",
            )));
        }
    };

    Ok(HttpResponse::Created().json(country))
}

pub async fn edit(
    db_thread_pool: web::Data<DbThreadPool>,
    _admin_token: AdminToken,
    country_id: web::Path<Uuid>,
    country_changes: web::Json<InputCountry>,
) -> Result<HttpResponse, HttpErrorResponse> {
    validate_country(&country_changes)?;

    let country_id = country_id.into_inner();

    let country = match web::block(move || {
        let country_dao = db::country::Dao::new(&db_thread_pool);
        country_dao.update_country(
            country_id,
            &country_changes.name,
            &country_changes.national_currency_name,
            &country_changes.national_currency_symbol,
        )
    })
    .await?
    {
        Ok(c) => c,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(COUNTRY_NOT_FOUND_MSG),
                DoesNotExistType::Country,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to update country",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(country))
}

pub async fn delete(
    db_thread_pool: web::Data<DbThreadPool>,
    _admin_token: AdminToken,
    country_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let country_id = country_id.into_inner();

    match web::block(move || {
        let country_dao = db::country::Dao::new(&db_thread_pool);
        country_dao.delete_country(country_id)
    })
    .await?
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(COUNTRY_NOT_FOUND_MSG),
                DoesNotExistType::Country,
            ));
        }
        Err(DaoError::CannotRunQuery(msg)) => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(msg)));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to delete country",
            )));
        }
    };

    Ok(HttpResponse::NoContent().finish())
}
