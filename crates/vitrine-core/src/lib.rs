use thiserror::Error;

pub mod app_config;
mod config;
pub mod gallery;
pub mod item;
pub mod money;
pub mod orientation;
pub mod whatsapp;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use gallery::GalleryState;
pub use item::{
    Item, ItemPayload, ResolvedItem, Settings, ValidationError, MAX_IMAGES_PER_ITEM,
};
pub use orientation::{ImageDimensions, Orientation};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
