pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, ForgeConfig};
pub use error::{ForgeError, Result};
pub use types::{SequenceId, TechLevel};
