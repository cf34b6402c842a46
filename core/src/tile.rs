use serde::{Deserialize, Serialize};

use crate::TileIndex;

/// A single board position and whether it hides a mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub index: TileIndex,
    pub has_mine: bool,
}

impl Tile {
    pub const fn is_safe(self) -> bool {
        !self.has_mine
    }
}

/// What a player is allowed to see of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Gem,
    Mine,
}

impl TileView {
    pub const fn of(tile: Tile, revealed: bool) -> Self {
        match (revealed, tile.has_mine) {
            (false, _) => Self::Hidden,
            (true, false) => Self::Gem,
            (true, true) => Self::Mine,
        }
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for TileView {
    fn default() -> Self {
        Self::Hidden
    }
}
