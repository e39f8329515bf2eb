pub mod extractors;
pub mod flow;
pub mod middleware;
pub mod password;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;

pub use extractors::CurrentUser;
pub use flow::{login, signup, TokenResponse};
pub use middleware::{authenticate, AuthMiddleware};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Failures raised by credential hashing, token handling and the signup/login flows.
///
/// The `Display` text of each variant is what the client eventually sees, so none of
/// them may say which half of a credential was wrong.
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    InvalidToken,
    /// The token verified but its subject no longer exists.
    #[error("Could not validate credentials")]
    UnknownSubject,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}
