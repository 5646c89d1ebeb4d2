use actix_web::web::*;

use crate::handlers::{account, index};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.route("/", get().to(index::dashboard))
        .route("/my-balance/", get().to(account::my_balance));
}
