use core::fmt;
use thiserror::Error;

use crate::{CellCount, GridSize, Phase, TileIndex};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ConfigIssue),
    #[error("Cannot {operation} while the session is {phase}")]
    IllegalTransition { operation: Operation, phase: Phase },
    #[error("Tile index {0} is outside the board")]
    InvalidIndex(TileIndex),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("grid size {requested} is not in 1..={max}")]
    GridSize { requested: GridSize, max: GridSize },
    #[error("{requested} mines do not fit on a board of {max} tiles")]
    TooManyMines {
        requested: CellCount,
        max: CellCount,
    },
}

/// Session operations that can be refused because of the current phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Configure,
    StartRound,
    RevealTile,
    CashOut,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configure => "configure",
            Self::StartRound => "start a round",
            Self::RevealTile => "reveal a tile",
            Self::CashOut => "cash out",
        })
    }
}

pub type Result<T> = core::result::Result<T, SessionError>;
