use bank_common::db::{self, DaoError, DbThreadPool};
use bank_common::request_io::InputCategory;
use bank_common::validators::MAX_CATEGORY_NAME_LENGTH;

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::handlers::validation;
use crate::middleware::auth::{Access, AdminToken, VerifiedToken};

const CATEGORY_NOT_FOUND_MSG: &str = "No category with ID matching request";

pub async fn get_all(
    db_thread_pool: web::Data<DbThreadPool>,
    _user_access_token: VerifiedToken<Access>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let categories = match web::block(move || {
        let category_dao = db::category::Dao::new(&db_thread_pool);
        category_dao.get_all_categories()
    })
    .await?
    {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get categories",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(categories))
}

pub async fn get(
    db_thread_pool: web::Data<DbThreadPool>,
    _user_access_token: VerifiedToken<Access>,
    category_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let category_id = category_id.into_inner();

    let category = match web::block(move || {
        let category_dao = db::category::Dao::new(&db_thread_pool);
        category_dao.get_category(category_id)
    })
    .await?
    {
        Ok(c) => c,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(CATEGORY_NOT_FOUND_MSG),
                DoesNotExistType::Category,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get category",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(category))
}

pub async fn create(
    db_thread_pool: web::Data<DbThreadPool>,
    _admin_token: AdminToken,
    new_category: web::Json<InputCategory>,
) -> Result<HttpResponse, HttpErrorResponse> {
    validation::check_name(&new_category.name, "Category name", MAX_CATEGORY_NAME_LENGTH)?;

    let category = match web::block(move || {
        let category_dao = db::category::Dao::new(&db_thread_pool);
        category_dao.create_category(&new_category.name, new_category.category_type)
    })
    .await?
    {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to create category",
            )));
        }
    };

    Ok(HttpResponse::Created().json(category))
}

pub async fn edit(
    db_thread_pool: web::Data<DbThreadPool>,
    _admin_token: AdminToken,
    category_id: web::Path<Uuid>,
    category_changes: web::Json<InputCategory>,
) -> Result<HttpResponse, HttpErrorResponse> {
    validation::check_name(
        &category_changes.name,
        "Category name",
        MAX_CATEGORY_NAME_LENGTH,
    )?;

    let category_id = category_id.into_inner();

    let category = match web::block(move || {
        let category_dao = db::category::Dao::new(&db_thread_pool);
        category_dao.update_category(
            category_id,
            &category_changes.name,
            category_changes.category_type,
        )
    })
    .await?
    {
        Ok(c) => c,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(CATEGORY_NOT_FOUND_MSG),
                DoesNotExistType::Category,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to update category",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(category))
}

pub async fn delete(
    db_thread_pool: web::Data<DbThreadPool>,
    _admin_token: AdminToken,
    category_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let category_id = category_id.into_inner();

    match web::block(move || {
        let category_dao = db::category::Dao::new(&db_thread_pool);
        category_dao.delete_category(category_id)
    })
    .await?
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(CATEGORY_NOT_FOUND_MSG),
                DoesNotExistType::Category,
            ));
        }
        Err(DaoError::CannotRunQuery(msg)) => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(msg)));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to delete category",
            )));
        }
    };

    Ok(HttpResponse::NoContent().finish())
}
