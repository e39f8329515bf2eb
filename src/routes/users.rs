use actix_web::{get, HttpResponse, Responder};

use crate::auth::CurrentUser;
use crate::models::UserOut;

/// Returns the authenticated user's public profile.
#[get("/me")]
pub async fn me(CurrentUser(user): CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(UserOut::from(&user))
}
