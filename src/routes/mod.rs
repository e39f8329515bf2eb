pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

use actix_web::{
    error::{JsonPayloadError, UrlencodedError},
    web, HttpRequest,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. Expects `web::Data<AppState>` on the app.
///
/// `/users` and `/todos` sit behind [`AuthMiddleware`]; `/auth` is open.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::FormConfig::default().error_handler(form_error))
        .service(health::root)
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::signup)
                .service(auth::login),
        )
        .service(web::scope("/users").wrap(AuthMiddleware).service(users::me))
        .service(
            web::scope("/todos")
                .wrap(AuthMiddleware)
                .service(todos::list_todos)
                .service(todos::create_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn form_error(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}
