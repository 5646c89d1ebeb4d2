use actix_web::web::*;

use crate::handlers::account;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/account")
            .route("/", post().to(account::create))
            .route("/{account_id}/", get().to(account::get))
            .route("/{account_id}/", delete().to(account::delete)),
    );
}
