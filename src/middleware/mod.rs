pub mod auth;

pub use auth::{identity_middleware, CurrentAdmin, CurrentUser, USER_ID_HEADER};
