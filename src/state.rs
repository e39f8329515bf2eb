use std::sync::Arc;

use crate::auth::TokenService;
use crate::store::{TodoStore, UserStore};

/// Shared, read-only application state handed to every handler as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: TokenService,
}

impl AppState {
    /// Uses one backend for both users and todos.
    pub fn new<S>(store: Arc<S>, tokens: TokenService) -> Self
    where
        S: UserStore + TodoStore + 'static,
    {
        Self {
            users: store.clone(),
            todos: store,
            tokens,
        }
    }
}
