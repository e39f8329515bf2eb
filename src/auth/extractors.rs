use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// Extracts the authenticated user from request extensions.
///
/// Only usable on routes wrapped by `AuthMiddleware`, which resolves the bearer
/// token and inserts the `User`. If the user is missing, the middleware was not
/// applied and the request is answered with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                log::warn!("No authenticated user on {}; is AuthMiddleware applied?", req.path());
                let err = AppError::Unauthorized("Could not validate credentials".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
