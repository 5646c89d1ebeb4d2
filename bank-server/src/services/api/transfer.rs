use actix_web::web::*;

use crate::handlers::transfer;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        resource("/money-transfer/")
            .route(get().to(transfer::form))
            .route(post().to(transfer::send)),
    );
}
