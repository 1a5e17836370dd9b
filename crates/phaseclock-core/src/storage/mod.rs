mod config;

pub use config::{Config, PhaseSettings, PlayerSettings};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding `config.toml`.
///
/// `PHASECLOCK_HOME` wins when set. Otherwise `~/.config/phaseclock[-dev]/`,
/// where `PHASECLOCK_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("PHASECLOCK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PHASECLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("phaseclock-dev")
            } else {
                base_dir.join("phaseclock")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
