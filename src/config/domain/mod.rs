//! Configuration values.

mod app;
mod error;
mod layout;

pub use app::{
    AppConfig, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_MAX_ITERATIONS, DEFAULT_PROVIDER,
};
pub use error::ConfigError;
pub use layout::ProjectLayout;
