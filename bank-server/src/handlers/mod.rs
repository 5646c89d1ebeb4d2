pub mod account;
pub mod category;
pub mod country;
pub mod health;
pub mod index;
pub mod transaction;
pub mod transfer;
pub mod user;

pub mod validation {
    use bank_common::validators::{self, Validity};

    use super::error::HttpErrorResponse;

    /// Names over the limit are rejected as too large, blank names as malformed.
    pub fn check_name(name: &str, field: &str, max_len: usize) -> Result<(), HttpErrorResponse> {
        if name.chars().count() > max_len {
            return Err(HttpErrorResponse::InputTooLarge(format!(
                "{field} cannot be longer than {max_len} characters"
            )));
        }

        check(validators::validate_name(name, field, max_len))
    }

    pub fn check(validity: Validity) -> Result<(), HttpErrorResponse> {
        match validity {
            Validity::Valid => Ok(()),
            Validity::Invalid(msg) => Err(HttpErrorResponse::IncorrectlyFormed(msg)),
        }
    }
}

pub mod error {
    use bank_common::request_io::{ErrorType, ServerErrorResponse};
    use bank_common::token::TokenError;

    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use std::fmt;

    #[derive(Debug)]
    pub enum DoesNotExistType {
        User,
        Account,
        Category,
        Country,
        Transaction,
    }

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        IncorrectlyFormed(String),
        InvalidState(String),
        ConflictWithExisting(String),
        SameAccount(String),
        InsufficientFunds(String),

        // 401
        IncorrectCredential(String),
        TokenExpired(String),
        TokenMissing(String),
        WrongTokenType(String),

        // 403
        UserDisallowed(String),

        // 404
        DoesNotExist(String, DoesNotExistType),

        // 413
        InputTooLarge(String),

        // 500
        InternalError(String),
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let server_error: ServerErrorResponse = self.into();
            write!(f, "{:?}", server_error)
        }
    }

    impl From<HttpErrorResponse> for ServerErrorResponse {
        fn from(resp: HttpErrorResponse) -> Self {
            (&resp).into()
        }
    }

    impl From<&HttpErrorResponse> for ServerErrorResponse {
        fn from(resp: &HttpErrorResponse) -> Self {
            match resp {
                // 400
                HttpErrorResponse::IncorrectlyFormed(msg) => ServerErrorResponse {
                    err_type: ErrorType::IncorrectlyFormed,
                    err_message: format!("Incorrectly formed request: {msg}"),
                },
                HttpErrorResponse::InvalidState(msg) => ServerErrorResponse {
                    err_type: ErrorType::InvalidState,
                    err_message: format!("Invalid state: {msg}"),
                },
                HttpErrorResponse::ConflictWithExisting(msg) => ServerErrorResponse {
                    err_type: ErrorType::ConflictWithExisting,
                    err_message: format!("Conflict with existing data: {msg}"),
                },
                HttpErrorResponse::SameAccount(msg) => ServerErrorResponse {
                    err_type: ErrorType::SameAccount,
                    err_message: format!("Same account: {msg}"),
                },
                HttpErrorResponse::InsufficientFunds(msg) => ServerErrorResponse {
                    err_type: ErrorType::InsufficientFunds,
                    err_message: format!("Insufficient funds: {msg}"),
                },

                // 401
                HttpErrorResponse::IncorrectCredential(msg) => ServerErrorResponse {
                    err_type: ErrorType::IncorrectCredential,
                    err_message: format!("Incorrect credential: {msg}"),
                },
                HttpErrorResponse::TokenExpired(msg) => ServerErrorResponse {
                    err_type: ErrorType::TokenExpired,
                    err_message: format!("Token expired: {msg}"),
                },
                HttpErrorResponse::TokenMissing(msg) => ServerErrorResponse {
                    err_type: ErrorType::TokenMissing,
                    err_message: format!("Token missing: {msg}"),
                },
                HttpErrorResponse::WrongTokenType(msg) => ServerErrorResponse {
                    err_type: ErrorType::WrongTokenType,
                    err_message: format!("Wrong token type: {msg}"),
                },

                // 403
                HttpErrorResponse::UserDisallowed(msg) => ServerErrorResponse {
                    err_type: ErrorType::UserDisallowed,
                    err_message: format!("User disallowed: {msg}"),
                },

                // 404
                HttpErrorResponse::DoesNotExist(msg, dne_type) => ServerErrorResponse {
                    err_type: match dne_type {
                        DoesNotExistType::User => ErrorType::UserDoesNotExist,
                        DoesNotExistType::Account => ErrorType::AccountDoesNotExist,
                        DoesNotExistType::Category => ErrorType::CategoryDoesNotExist,
                        DoesNotExistType::Country => ErrorType::CountryDoesNotExist,
                        DoesNotExistType::Transaction => ErrorType::TransactionDoesNotExist,
                    },
                    err_message: format!("Does not exist: {msg}"),
                },

                // 413
                HttpErrorResponse::InputTooLarge(msg) => ServerErrorResponse {
                    err_type: ErrorType::InputTooLarge,
                    err_message: format!("Input is too long: {msg}"),
                },

                // 500
                HttpErrorResponse::InternalError(msg) => ServerErrorResponse {
                    err_type: ErrorType::InternalError,
                    err_message: format!("Internal error: {msg}"),
                },
            }
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            HttpResponseBuilder::new(self.status_code()).json(ServerErrorResponse::from(self))
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::IncorrectlyFormed(_)
                | HttpErrorResponse::InvalidState(_)
                | HttpErrorResponse::ConflictWithExisting(_)
                | HttpErrorResponse::SameAccount(_)
                | HttpErrorResponse::InsufficientFunds(_) => StatusCode::BAD_REQUEST,
                HttpErrorResponse::IncorrectCredential(_)
                | HttpErrorResponse::TokenExpired(_)
                | HttpErrorResponse::TokenMissing(_)
                | HttpErrorResponse::WrongTokenType(_) => StatusCode::UNAUTHORIZED,
                HttpErrorResponse::UserDisallowed(_) => StatusCode::FORBIDDEN,
                HttpErrorResponse::DoesNotExist(_, _) => StatusCode::NOT_FOUND,
                HttpErrorResponse::InputTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                HttpErrorResponse::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl From<actix_web::error::BlockingError> for HttpErrorResponse {
        fn from(_err: actix_web::error::BlockingError) -> Self {
            HttpErrorResponse::InternalError(String::from("Actix thread pool failure"))
        }
    }

    impl From<TokenError> for HttpErrorResponse {
        fn from(err: TokenError) -> Self {
            match err {
                TokenError::TokenInvalid => {
                    HttpErrorResponse::IncorrectCredential(String::from("Token is invalid"))
                }
                TokenError::TokenExpired => {
                    HttpErrorResponse::TokenExpired(String::from("Token is expired"))
                }
                TokenError::TokenMissing => {
                    HttpErrorResponse::TokenMissing(String::from("Token is missing"))
                }
                TokenError::WrongTokenType => {
                    HttpErrorResponse::WrongTokenType(String::from("Incorrect token type"))
                }
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use actix_web::body::to_bytes;
        use actix_web::ResponseError;

        #[actix_web::test]
        async fn test_error_response_body() {
            let err = HttpErrorResponse::DoesNotExist(
                String::from("No account with that ID"),
                DoesNotExistType::Account,
            );

            let resp = err.error_response();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);

            let body = to_bytes(resp.into_body()).await.unwrap();
            let body: ServerErrorResponse = serde_json::from_slice(&body).unwrap();

            assert_eq!(body.err_type, ErrorType::AccountDoesNotExist);
            assert_eq!(body.err_message, "Does not exist: No account with that ID");
        }

        #[test]
        fn test_status_codes() {
            let cases = [
                (
                    HttpErrorResponse::SameAccount(String::new()),
                    StatusCode::BAD_REQUEST,
                ),
                (
                    HttpErrorResponse::InsufficientFunds(String::new()),
                    StatusCode::BAD_REQUEST,
                ),
                (
                    HttpErrorResponse::from(TokenError::TokenExpired),
                    StatusCode::UNAUTHORIZED,
                ),
                (
                    HttpErrorResponse::UserDisallowed(String::new()),
                    StatusCode::FORBIDDEN,
                ),
                (
                    HttpErrorResponse::InputTooLarge(String::new()),
                    StatusCode::PAYLOAD_TOO_LARGE,
                ),
                (
                    HttpErrorResponse::InternalError(String::new()),
                    StatusCode::INTERNAL_SERVER_ERROR,
                ),
            ];

            for (err, status) in cases {
                assert_eq!(err.status_code(), status);
            }
        }
    }
}

#[cfg(test)]
pub mod test_utils {
    use bank_common::db;
    use bank_common::models::account::Account;
    use bank_common::models::category::CategoryType;
    use bank_common::models::user::{User, UserType};
    use bank_common::schema::accounts::dsl::accounts;
    use bank_common::threadrand::SecureRng;
    use bank_common::token::auth_token::{AuthToken, AuthTokenType, NewAuthTokenClaims};

    use actix_web::body::to_bytes;
    use actix_web::dev::ServiceResponse;
    use actix_web::web::Data;
    use actix_web::App;
    use diesel::{dsl, ExpressionMethods, QueryDsl, RunQueryDsl};
    use rust_decimal::Decimal;
    use serde::de::DeserializeOwned;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    use crate::env;

    pub fn app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(Data::new(env::testing::DB_THREAD_POOL.clone()))
            .configure(crate::services::api::configure)
    }

    pub fn unique_name(prefix: &str) -> String {
        format!("{prefix}-{}", SecureRng::next_u128())
    }

    pub fn gen_access_token(user_id: Uuid, username: &str, is_admin: bool) -> String {
        let claims = NewAuthTokenClaims {
            user_id,
            username,
            is_admin,
            expiration: (SystemTime::now() + Duration::from_secs(60))
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs(),
            token_type: AuthTokenType::Access,
        };

        AuthToken::sign_new(claims, &env::CONF.token_signing_key)
    }

    pub fn gen_admin_token() -> String {
        gen_access_token(Uuid::now_v7(), &unique_name("admin"), true)
    }

    pub fn create_country() -> Uuid {
        db::country::Dao::new(&env::testing::DB_THREAD_POOL)
            .create_country(&unique_name("country"), "Hryvnia", "₴")
            .unwrap()
            .id
    }

    pub fn create_category(category_type: CategoryType) -> Uuid {
        db::category::Dao::new(&env::testing::DB_THREAD_POOL)
            .create_category(&unique_name("category"), category_type)
            .unwrap()
            .id
    }

    /// Registers a user profile and returns it with a matching access token.
    pub fn create_user(user_type: UserType) -> (User, String) {
        let user_id = Uuid::now_v7();
        let username = unique_name("user");

        let user = db::user::Dao::new(&env::testing::DB_THREAD_POOL)
            .create_user(user_id, &username, None, create_country(), user_type)
            .unwrap();

        let token = gen_access_token(user_id, &username, false);

        (user, token)
    }

    pub fn create_account(user_id: Uuid, balance: Decimal) -> Account {
        let account = db::account::Dao::new(&env::testing::DB_THREAD_POOL)
            .create_account(user_id, None)
            .unwrap();

        dsl::update(accounts.find(account.id))
            .set(bank_common::schema::accounts::balance.eq(balance))
            .get_result::<Account>(&mut env::testing::DB_THREAD_POOL.get().unwrap())
            .unwrap()
    }

    pub fn get_account(account_id: Uuid) -> Account {
        accounts
            .find(account_id)
            .get_result::<Account>(&mut env::testing::DB_THREAD_POOL.get().unwrap())
            .unwrap()
    }

    pub async fn read_json<T: DeserializeOwned>(resp: ServiceResponse) -> T {
        let body = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}
