use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use super::{AuthError, TokenService};
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;
use crate::store::UserStore;

/// Resolves a raw bearer token to the user it was issued for.
///
/// This is the only place a token is turned into a `User`; protected routes reach
/// it through [`AuthMiddleware`] and never check credentials themselves.
pub async fn authenticate(
    tokens: &TokenService,
    users: &dyn UserStore,
    raw_token: &str,
) -> Result<User, AuthError> {
    let claims = tokens.verify(raw_token)?;
    users
        .find_user_by_id(claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject)
}

/// Returns the token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid bearer token and stores the authenticated
/// [`User`] in the request extensions for [`super::CurrentUser`].
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("AppState is not registered".into())
                })?;

            let token = bearer_token(req.headers())
                .map(str::to_owned)
                .ok_or_else(|| {
                    log::debug!("Missing bearer token for {}", req.path());
                    AppError::from(AuthError::InvalidToken)
                })?;

            let user = authenticate(&state.tokens, state.users.as_ref(), &token)
                .await
                .map_err(AppError::from)?;

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}
