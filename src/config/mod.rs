//! Configuration surface: types, validation, and the Figment loader.

mod loader;
mod types;

pub use loader::{ConfigLoader, PROJECT_CONFIG_PATH};
pub use types::{Config, OnConflict, QuoteStyle};
