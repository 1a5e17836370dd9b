pub mod config;
pub mod play;
pub mod preset;
pub mod simulate;

use std::time::Duration;

use phaseclock_core::{presets, Config, Player, PlayerConfig};

/// Everything needed to start a game.
pub struct GameSetup {
    pub left: PlayerConfig,
    pub right: PlayerConfig,
    pub first: Player,
    pub tick_interval: Duration,
}

/// Time controls for a game: a preset for both players, or the config file.
///
/// A config file that cannot be read is an error even when a preset is
/// given, so a broken file never goes unnoticed.
pub fn game_setup(
    preset: Option<&str>,
    first: Option<Player>,
) -> Result<GameSetup, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let [left, right] = match preset {
        Some(name) => {
            let player = presets::preset(name)?.settings.to_player_config()?;
            [player.clone(), player]
        }
        None => config.player_configs()?,
    };
    Ok(GameSetup {
        left,
        right,
        first: first.unwrap_or(config.first_to_move),
        tick_interval: config.tick_interval(),
    })
}
