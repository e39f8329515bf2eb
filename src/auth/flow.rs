//! Signup and login orchestration.

use serde::{Deserialize, Serialize};

use super::password::{validate_password_strength, verify_against_placeholder};
use super::{hash_password, verify_password};
use super::{AuthError, TokenService};
use crate::models::{User, UserOut};
use crate::store::{StoreError, UserStore};

/// Body returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Registers a new account and returns its public view.
///
/// A taken email is reported before the password is checked.
pub async fn signup(
    users: &dyn UserStore,
    email: String,
    password: &str,
    full_name: Option<String>,
) -> Result<UserOut, AuthError> {
    if users.find_user_by_email(&email).await?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }
    validate_password_strength(password)?;

    let user = User::new(email, full_name, hash_password(password)?);
    users.insert_user(&user).await.map_err(|e| match e {
        // Lost a race with a concurrent signup for the same email.
        StoreError::DuplicateEmail => AuthError::DuplicateEmail,
        other => AuthError::Store(other),
    })?;

    log::info!("Registered user {}", user.id);
    Ok(UserOut::from(&user))
}

/// Checks credentials and issues a bearer token with the default ttl.
///
/// An unknown email and a wrong password produce the same
/// `AuthError::InvalidCredentials`, and both pay for one password verification.
pub async fn login(
    users: &dyn UserStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<TokenResponse, AuthError> {
    let user = match users.find_user_by_email(email).await? {
        Some(user) => user,
        None => {
            verify_against_placeholder(password);
            return Err(AuthError::InvalidCredentials);
        }
    };
    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let access_token = tokens.issue(user.id, None)?;
    log::info!("User {} logged in", user.id);

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;
    use std::time::{Duration as StdDuration, Instant};

    fn tokens() -> TokenService {
        TokenService::new("flow_secret", Algorithm::HS256, Duration::minutes(60)).unwrap()
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryStore::new();
        let tokens = tokens();

        let created = signup(&store, "a@x.com".into(), "longpass1", Some("A".into()))
            .await
            .unwrap();
        assert_eq!(created.email, "a@x.com");
        assert_eq!(created.full_name.as_deref(), Some("A"));

        let stored = store.find_user_by_id(created.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "longpass1");

        let response = login(&store, &tokens, "a@x.com", "longpass1").await.unwrap();
        assert_eq!(response.token_type, "bearer");
        assert_eq!(tokens.verify(&response.access_token).unwrap().sub, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_signup_fails() {
        let store = MemoryStore::new();
        signup(&store, "dup@x.com".into(), "longpass1", None)
            .await
            .unwrap();

        let second = signup(&store, "dup@x.com".into(), "otherpass2", None).await;
        assert_eq!(second, Err(AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_duplicate_is_reported_before_weak_password() {
        let store = MemoryStore::new();
        signup(&store, "dup@x.com".into(), "longpass1", None)
            .await
            .unwrap();

        let second = signup(&store, "dup@x.com".into(), "short", None).await;
        assert_eq!(second, Err(AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_weak_password_creates_nothing() {
        let store = MemoryStore::new();
        let result = signup(&store, "weak@x.com".into(), "1234567", None).await;

        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
        assert!(store.find_user_by_email("weak@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        let tokens = tokens();
        signup(&store, "a@x.com".into(), "longpass1", None)
            .await
            .unwrap();

        let wrong_password = login(&store, &tokens, "a@x.com", "wrongpass1").await;
        let unknown_email = login(&store, &tokens, "nobody@x.com", "longpass1").await;

        let wrong_password = wrong_password.unwrap_err();
        let unknown_email = unknown_email.unwrap_err();
        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    async fn average_login_time(
        store: &MemoryStore,
        tokens: &TokenService,
        email: &str,
        password: &str,
    ) -> StdDuration {
        const ROUNDS: u32 = 5;
        let start = Instant::now();
        for _ in 0..ROUNDS {
            assert_eq!(
                login(store, tokens, email, password).await.unwrap_err(),
                AuthError::InvalidCredentials
            );
        }
        start.elapsed() / ROUNDS
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_password_verification() {
        let store = MemoryStore::new();
        let tokens = tokens();
        signup(&store, "a@x.com".into(), "longpass1", None)
            .await
            .unwrap();

        // Warm up the lazily built placeholder hash.
        let _ = login(&store, &tokens, "nobody@x.com", "longpass1").await;

        let wrong_password = average_login_time(&store, &tokens, "a@x.com", "wrongpass1").await;
        let unknown_email = average_login_time(&store, &tokens, "nobody@x.com", "wrongpass1").await;

        // Same order of magnitude: without the placeholder check the unknown email
        // path is roughly a thousand times faster.
        assert!(
            unknown_email * 10 >= wrong_password && wrong_password * 10 >= unknown_email,
            "wrong password took {:?}, unknown email took {:?}",
            wrong_password,
            unknown_email
        );
    }
}
