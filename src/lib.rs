#![doc = "The `todoapp` library crate."]
#![doc = ""]
#![doc = "Credential hashing, bearer-token issuance and validation, the access-control"]
#![doc = "middleware, per-user todo operations, the store backends and the HTTP routes."]
#![doc = "The binary (`main.rs`) only wires these together and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod todos;

pub use crate::error::AppError;
pub use crate::state::AppState;
