#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use driver::*;
pub use error::*;
pub use generator::*;
pub use schedule::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod driver;
mod error;
mod generator;
mod schedule;
mod session;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid_size: GridSize,
    pub mine_count: CellCount,
    pub bet_amount: BetAmount,
}

impl GameConfig {
    pub const DEFAULT_GRID_SIZE: GridSize = 5;
    pub const MAX_GRID_SIZE: GridSize = 15;
    pub const DEFAULT_MINE_COUNT: CellCount = 3;

    pub const fn new_unchecked(
        grid_size: GridSize,
        mine_count: CellCount,
        bet_amount: BetAmount,
    ) -> Self {
        Self {
            grid_size,
            mine_count,
            bet_amount,
        }
    }

    pub fn new(grid_size: GridSize, mine_count: CellCount, bet_amount: BetAmount) -> Result<Self> {
        let config = Self::new_unchecked(grid_size, mine_count, bet_amount);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(SessionError::InvalidConfiguration(ConfigIssue::GridSize {
                requested: self.grid_size,
                max: Self::MAX_GRID_SIZE,
            }));
        }
        self.check_mine_count(self.mine_count)
    }

    pub(crate) fn check_mine_count(&self, mine_count: CellCount) -> Result<()> {
        let max = self.total_tiles();
        if mine_count > max {
            Err(SessionError::InvalidConfiguration(
                ConfigIssue::TooManyMines {
                    requested: mine_count,
                    max,
                },
            ))
        } else {
            Ok(())
        }
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }

    pub const fn is_demo(&self) -> bool {
        self.bet_amount == 0
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_GRID_SIZE, Self::DEFAULT_MINE_COUNT, 0)
    }
}

/// Mine placement for one round, fixed from round start until the next reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Board with no mines, used between rounds.
    pub fn empty(grid_size: GridSize) -> Self {
        Self {
            mine_mask: Array2::default((grid_size, grid_size).to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn full(grid_size: GridSize) -> Self {
        Self {
            mine_mask: Array2::from_elem((grid_size, grid_size).to_nd_index(), true),
            mine_count: mult(grid_size, grid_size),
        }
    }

    pub fn from_mine_indices(grid_size: GridSize, mine_indices: &[TileIndex]) -> Result<Self> {
        let mut layout = Self::empty(grid_size);
        for &index in mine_indices {
            let index = layout.validate_index(index)?;
            layout.place_mine(index);
        }
        Ok(layout)
    }

    /// Marks `index` as a mine, returns whether it was newly placed.
    pub(crate) fn place_mine(&mut self, index: TileIndex) -> bool {
        let coords = index_to_coords(index, self.grid_size());
        let cell = &mut self.mine_mask[coords.to_nd_index()];
        if *cell {
            false
        } else {
            *cell = true;
            self.mine_count += 1;
            true
        }
    }

    pub fn validate_index(&self, index: TileIndex) -> Result<TileIndex> {
        if index < self.total_tiles() {
            Ok(index)
        } else {
            Err(SessionError::InvalidIndex(index))
        }
    }

    pub fn grid_size(&self) -> GridSize {
        // square and bounded by GameConfig::MAX_GRID_SIZE
        self.mine_mask.dim().0 as GridSize
    }

    pub fn total_tiles(&self) -> CellCount {
        mult(self.grid_size(), self.grid_size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_tile_count(&self) -> CellCount {
        self.total_tiles() - self.mine_count
    }

    pub fn contains_mine(&self, index: TileIndex) -> bool {
        self[index]
    }

    pub fn tile(&self, index: TileIndex) -> Tile {
        Tile {
            index,
            has_mine: self[index],
        }
    }

    /// Mine positions in ascending index order.
    pub fn mine_indices(&self) -> impl Iterator<Item = TileIndex> + '_ {
        (0..self.total_tiles()).filter(|&index| self[index])
    }
}

impl Index<TileIndex> for MineLayout {
    type Output = bool;

    fn index(&self, index: TileIndex) -> &Self::Output {
        let coords = index_to_coords(index, self.grid_size());
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Outcome of revealing a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Gem,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the session
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Gem => true,
            HitMine => true,
            Won => true,
        }
    }

    /// Whether the reveal ended the round
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{vec, vec::Vec};

    #[test]
    fn default_config_matches_classic_board() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.mine_count, 3);
        assert_eq!(config.total_tiles(), 25);
        assert!(config.is_demo());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_too_many_mines() {
        assert_eq!(
            GameConfig::new(5, 26, 0),
            Err(SessionError::InvalidConfiguration(
                ConfigIssue::TooManyMines {
                    requested: 26,
                    max: 25
                }
            ))
        );
        assert!(GameConfig::new(5, 25, 0).is_ok());
    }

    #[test]
    fn config_rejects_bad_grid_size() {
        assert!(matches!(
            GameConfig::new(0, 0, 0),
            Err(SessionError::InvalidConfiguration(
                ConfigIssue::GridSize { .. }
            ))
        ));
        assert!(matches!(
            GameConfig::new(16, 0, 0),
            Err(SessionError::InvalidConfiguration(
                ConfigIssue::GridSize { .. }
            ))
        ));
    }

    #[test]
    fn layout_from_indices_counts_each_mine_once() {
        let layout = MineLayout::from_mine_indices(5, &[0, 7, 7, 24]).unwrap();

        assert_eq!(layout.mine_count(), 3);
        assert_eq!(layout.safe_tile_count(), 22);
        assert!(layout.contains_mine(7));
        assert!(!layout.contains_mine(8));
        assert_eq!(layout.mine_indices().collect::<Vec<_>>(), vec![0, 7, 24]);
    }

    #[test]
    fn layout_from_indices_rejects_out_of_range() {
        assert_eq!(
            MineLayout::from_mine_indices(5, &[25]),
            Err(SessionError::InvalidIndex(25))
        );
    }

    #[test]
    fn full_layout_has_no_safe_tiles() {
        let layout = MineLayout::full(5);
        assert_eq!(layout.mine_count(), 25);
        assert_eq!(layout.safe_tile_count(), 0);
        assert!((0..25).all(|i| layout.contains_mine(i)));
    }
}
