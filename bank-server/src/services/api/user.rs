use actix_web::web::*;

use crate::handlers::user;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/user")
            .route("/", post().to(user::create))
            .route("/me/", get().to(user::get_me)),
    );
}
