pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{AppError, AppResult};
