//! Tool settings
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults
//! 2. Settings file (~/.config/json-override/settings.toml)
//! 3. CLI flags

mod defaults;
mod effective;

pub use defaults::Settings;
pub use effective::{CliOverrides, EffectiveSettings, SettingsError, SettingsOrigin, SettingsSource};
