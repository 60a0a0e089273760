mod config;
mod error;
mod repository;
mod user;

pub use config::{Config, DEFAULT_API_URL, REQUEST_TIMEOUT_SECS};
pub use error::{Error, Result};
pub use repository::Repository;
pub use user::User;
