use bank_common::db::{self, DbThreadPool};
use bank_common::request_io::OutputHealth;

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::env;
use crate::handlers::error::HttpErrorResponse;

#[derive(Deserialize)]
pub struct HealthKeyQuery {
    pub key: Option<String>,
}

pub async fn heartbeat() -> impl Responder {
    HttpResponse::Ok()
}

/// Reports whether the database answers a query, along with the connection pool's usage.
/// Responds with 503 when the database cannot be reached.
pub async fn health(
    db_thread_pool: web::Data<DbThreadPool>,
    query: web::Query<HealthKeyQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if !is_health_key_correct(query.key.as_deref()) {
        return Err(HttpErrorResponse::IncorrectCredential(String::from(
            "Health key is missing or incorrect",
        )));
    }

    let pool = db_thread_pool.clone();
    let database_check = web::block(move || {
        let health_dao = db::health::Dao::new(&pool);
        health_dao.check_database()
    })
    .await?;

    if let Err(e) = &database_check {
        log::error!("Database health check failed: {e}");
    }

    let pool_state = db_thread_pool.state();
    let health = OutputHealth {
        database_reachable: database_check.is_ok(),
        pool_connections: pool_state.connections,
        pool_idle_connections: pool_state.idle_connections,
        pool_max_size: db_thread_pool.max_size(),
    };

    if health.database_reachable {
        Ok(HttpResponse::Ok().json(health))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(health))
    }
}

fn is_health_key_correct(key: Option<&str>) -> bool {
    let Some(key) = key else {
        return false;
    };

    let key = key.as_bytes();
    let correct_key = env::CONF.health_endpoint_key.as_bytes();

    if key.is_empty() || key.len() != correct_key.len() {
        return false;
    }

    // Constant-time comparison
    key.iter()
        .zip(correct_key)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
