use bank_common::db::{self, DbThreadPool};

use actix_web::{web, HttpResponse};

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::{Access, VerifiedToken};

pub async fn dashboard(
    db_thread_pool: web::Data<DbThreadPool>,
    _user_access_token: VerifiedToken<Access>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let counts = match web::block(move || {
        let dashboard_dao = db::dashboard::Dao::new(&db_thread_pool);
        dashboard_dao.get_counts()
    })
    .await?
    {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to count records",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    use bank_common::models::user::UserType;
    use bank_common::request_io::OutputDashboard;

    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use rust_decimal::Decimal;

    use crate::handlers::test_utils;

    #[actix_web::test]
    async fn test_dashboard() {
        let app = test::init_service(test_utils::app()).await;

        let (user, access_token) = test_utils::create_user(UserType::Entrepreneur);
        test_utils::create_account(user.id, Decimal::ZERO);

        let req = TestRequest::get()
            .uri("/")
            .insert_header(("AccessToken", access_token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let counts: OutputDashboard = test_utils::read_json(resp).await;
        assert!(counts.num_entrepreneurs >= 1);
        assert!(counts.num_accounts >= 1);
        assert!(counts.num_countries >= 1);
        assert!(counts.num_general_users >= 0);
    }

    #[actix_web::test]
    async fn test_dashboard_requires_token() {
        let app = test::init_service(test_utils::app()).await;

        let req = TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
