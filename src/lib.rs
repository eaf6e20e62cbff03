pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use error::{AppError, Result};
pub use state::AppState;
