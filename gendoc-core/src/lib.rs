//! gendoc core library — session settings and configuration errors.
//!
//! Public API surface:
//! - [`settings`] — [`Settings`] load / validate / per-renderer path scoping
//! - [`error`] — [`ConfigError`]

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::Settings;
