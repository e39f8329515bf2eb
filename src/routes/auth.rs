use crate::auth as auth_flow;
use crate::{
    error::AppError,
    models::{LoginForm, SignupRequest},
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates an account and returns its public view (`id`, `email`, `full_name`).
/// Responds 400 when the email is taken or the password is too short, and 422 when
/// the email is not an email address.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let SignupRequest {
        email,
        password,
        full_name,
    } = signup_data.into_inner();

    let user = auth_flow::signup(state.users.as_ref(), email, &password, full_name).await?;

    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Takes a form-encoded `username` (the email) and `password` and returns a bearer
/// token. Any credential failure is the same 401.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let token = auth_flow::login(
        state.users.as_ref(),
        &state.tokens,
        &form.username,
        &form.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(token))
}
