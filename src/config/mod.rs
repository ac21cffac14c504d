//! Runtime configuration, sourced from environment variables.

pub mod settings;

pub use settings::Settings;
