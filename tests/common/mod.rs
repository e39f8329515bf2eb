#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use std::sync::Arc;
use todoapp::auth::TokenService;
use todoapp::routes;
use todoapp::state::AppState;
use todoapp::store::MemoryStore;

pub const TEST_SECRET: &str = "integration_test_secret";

pub fn token_service() -> TokenService {
    TokenService::new(TEST_SECRET, Algorithm::HS256, Duration::minutes(60))
        .expect("HS256 is always accepted")
}

/// Fresh state over an empty in-memory store.
pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(MemoryStore::new()), token_service()))
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

pub async fn signup<S, B>(app: &S, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_form([("username", email), ("password", password)])
        .to_request();
    test::call_service(app, req).await
}

/// Registers a user and logs them in, returning the bearer token.
pub async fn register_and_login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = signup(app, email, password).await;
    assert!(resp.status().is_success(), "signup failed: {}", resp.status());

    let resp = login(app, email, password).await;
    assert!(resp.status().is_success(), "login failed: {}", resp.status());
    let body: Value = test::read_body_json(resp).await;
    body["access_token"]
        .as_str()
        .expect("login response carries access_token")
        .to_string()
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
