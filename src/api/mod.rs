pub mod docs;
mod handlers;
mod metrics;
pub mod openapi;
mod request_id;
mod routes;

pub use handlers::{OAuth2PasswordRequest, TokenResponse};
pub use routes::*;
