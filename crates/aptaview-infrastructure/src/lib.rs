//! Infrastructure for aptaview: platform paths and settings
//! persistence on atomic TOML files.

pub mod paths;
pub mod settings_service;
pub mod storage;

pub use crate::paths::AptaviewPaths;
pub use crate::settings_service::SettingsService;
pub use crate::storage::TomlStore;
