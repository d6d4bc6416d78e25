pub mod loader;
pub mod settings;
pub mod types;

pub use settings::{LogFormat, LoggingConfig, ProviderSettings};
pub use types::ServiceConfig;
