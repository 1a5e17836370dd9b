use clap::Subcommand;
use phaseclock_core::{presets, Config, Player};

#[derive(Subcommand)]
pub enum PresetAction {
    /// List built-in time controls
    List,
    /// Show a preset as it would appear in the config file
    Show {
        /// Preset name (e.g. "blitz-3-2")
        name: String,
    },
    /// Write a preset into the config file
    Apply {
        name: String,
        /// Only apply to one side
        #[arg(long)]
        player: Option<Player>,
    },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PresetAction::List => {
            for p in presets::all() {
                println!("{:<18} {}", p.name, p.description);
            }
        }
        PresetAction::Show { name } => {
            let p = presets::preset(&name)?;
            println!("# {}", p.description);
            print!("{}", toml::to_string_pretty(&p.settings)?);
        }
        PresetAction::Apply { name, player } => {
            let p = presets::preset(&name)?;
            let mut config = Config::load()?;
            let targets = match player {
                Some(player) => vec![player],
                None => Player::BOTH.to_vec(),
            };
            for target in targets {
                let settings = match target {
                    Player::Left => &mut config.left,
                    Player::Right => &mut config.right,
                };
                // Keep the display name the user chose.
                let name = std::mem::take(&mut settings.name);
                *settings = p.settings.clone();
                settings.name = name;
            }
            config.player_configs()?;
            config.save()?;
            println!("applied {} to {}", p.name, player.map_or("both players", Player::as_str));
        }
    }
    Ok(())
}
