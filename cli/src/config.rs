use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use gemmines_core::{
    BetAmount, CellCount, DEFAULT_REVEAL_DELAY, GameConfig, GridSize, Sampling, mult,
};
use serde::Deserialize;
use web_time::Duration;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Mines in the terminal: pick a mine count, place a bet, find the gems"
)]
pub struct Args {
    /// TOML file with defaults, command line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Side length of the square board
    #[arg(long)]
    pub grid_size: Option<GridSize>,

    /// Mines hidden in each round, defaults to 3 capped at the tile count
    #[arg(long)]
    pub mines: Option<CellCount>,

    /// Starting bet, 0 plays in demo mode
    #[arg(long)]
    pub bet: Option<BetAmount>,

    /// Force a seed instead of random
    #[arg(long)]
    pub seed: Option<u64>,

    /// Delay before the whole board is shown after a round ends
    #[arg(long, value_name = "MS")]
    pub reveal_delay_ms: Option<u64>,

    /// Mine placement strategy: `rejection` or `partial-shuffle`
    #[arg(long)]
    pub sampling: Option<Sampling>,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

/// Same knobs as [`Args`], read from a file.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub grid_size: Option<GridSize>,
    pub mines: Option<CellCount>,
    pub bet: Option<BetAmount>,
    pub seed: Option<u64>,
    pub reveal_delay_ms: Option<u64>,
    pub sampling: Option<Sampling>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub game: GameConfig,
    pub seed: u64,
    pub reveal_delay: Duration,
    pub sampling: Sampling,
}

impl Settings {
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    fn merge(args: &Args, file: FileConfig) -> anyhow::Result<Self> {
        let defaults = GameConfig::default();
        let grid_size = args.grid_size.or(file.grid_size).unwrap_or(defaults.grid_size);
        // the default count must still fit when only the board shrinks
        let mine_count = args
            .mines
            .or(file.mines)
            .unwrap_or_else(|| defaults.mine_count.min(mult(grid_size, grid_size)));
        let game = GameConfig::new(
            grid_size,
            mine_count,
            args.bet.or(file.bet).unwrap_or(defaults.bet_amount),
        )?;
        let seed = args.seed.or(file.seed).unwrap_or_else(rand::random);
        let reveal_delay = args
            .reveal_delay_ms
            .or(file.reveal_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REVEAL_DELAY);
        let sampling = args.sampling.or(file.sampling).unwrap_or_default();

        log::debug!("using {:?}, seed {}, {:?}", game, seed, sampling);
        Ok(Self {
            game,
            seed,
            reveal_delay,
            sampling,
        })
    }
}
