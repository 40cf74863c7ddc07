mod api_key;
mod extract;
mod password;
mod store;
mod token;

pub use api_key::check_api_key;
pub use extract::{ApiKey, CurrentUser, UnverifiedClaims};
pub(crate) use extract::reject;
pub use password::{hash_password, verify_password};
pub use store::{InMemoryUserStore, Secret, User, UserStore};
pub use token::{Claims, TokenService, extract_bearer_token};
