use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, grid_size: GridSize, mine_count: CellCount) -> MineLayout;
}

/// How mine positions are drawn from the tile range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sampling {
    /// Draw uniform indices until enough distinct ones were seen.
    Rejection,
    /// Partial Fisher-Yates over the index range, bounded at `mine_count` draws.
    #[default]
    PartialShuffle,
}

impl core::str::FromStr for Sampling {
    type Err = UnknownSampling;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "rejection" => Ok(Self::Rejection),
            "partial-shuffle" | "shuffle" => Ok(Self::PartialShuffle),
            _ => Err(UnknownSampling),
        }
    }
}

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("unknown sampling strategy, expected `rejection` or `partial-shuffle`")]
pub struct UnknownSampling;
