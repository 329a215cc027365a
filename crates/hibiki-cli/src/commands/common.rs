//! Options shared by several commands.

use std::path::PathBuf;

use clap::Args;
use hibiki_hall::HallConfig;

/// Config file, macro steps and parameter overrides.
#[derive(Args, Debug, Default)]
pub struct HallArgs {
    /// Hall configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Size macro step (0-4)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=4))]
    pub size: Option<u32>,

    /// Shape macro step (0-4)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=4))]
    pub shape: Option<u32>,

    /// Tonality macro step (0-4)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=4))]
    pub tonality: Option<u32>,

    /// Presence macro step (0-4)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=4))]
    pub presence: Option<u32>,

    /// Parameter override by symbol (e.g., "l_time=3.5"), applied after the macros
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    pub param: Vec<(String, f32)>,
}

impl HallArgs {
    /// Load the config file (or defaults) and layer the flags on top.
    pub fn config(&self) -> anyhow::Result<HallConfig> {
        let mut config = match &self.config {
            Some(path) => HallConfig::load(path)?,
            None => HallConfig::default(),
        };

        let macros = &mut config.macros;
        for (flag, slot) in [
            (self.size, &mut macros.size),
            (self.shape, &mut macros.shape),
            (self.tonality, &mut macros.tonality),
            (self.presence, &mut macros.presence),
        ] {
            if let Some(step) = flag {
                *slot = step;
            }
        }

        for (symbol, value) in &self.param {
            config.overrides.insert(symbol.clone(), *value);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected symbol=value)", s))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid value for '{}': '{}'", key, value))?;
    Ok((key.trim().to_string(), value))
}
