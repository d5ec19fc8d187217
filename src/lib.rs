pub mod actions;
pub mod config;
pub mod error;
pub mod livepeer;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod uploads;

pub use config::{Config, LivepeerConfig};
pub use error::{LivegenError, Result};
pub use livepeer::{GenerateClient, ImageGenerator, LivepeerClient};
pub use models::*;
pub use uploads::UploadStore;
