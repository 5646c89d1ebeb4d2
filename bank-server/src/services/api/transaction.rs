use actix_web::web::*;

use crate::handlers::transaction;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/transaction")
            .route("/", get().to(transaction::get_all))
            .route("/{transaction_id}/", get().to(transaction::get)),
    );
}
