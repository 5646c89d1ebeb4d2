use actix_web::web::*;

use crate::handlers::category;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/category")
            .route("/", get().to(category::get_all))
            .route("/", post().to(category::create))
            .route("/{category_id}/", get().to(category::get))
            .route("/{category_id}/", put().to(category::edit))
            .route("/{category_id}/", delete().to(category::delete)),
    );
}
