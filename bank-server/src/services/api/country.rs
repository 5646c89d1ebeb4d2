use actix_web::web::*;

use crate::handlers::country;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/country")
            .route("/", get().to(country::get_all))
            .route("/", post().to(country::create))
            .route("/{country_id}/", get().to(country::get))
            .route("/{country_id}/", put().to(country::edit))
            .route("/{country_id}/", delete().to(country::delete)),
    );
}
