pub mod run_settings;

pub use run_settings::{RunSettings, SettingsOverrides, Transport};
