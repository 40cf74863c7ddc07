pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod observability;

mod state;

pub use config::*;
pub use state::*;
