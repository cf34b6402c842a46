/// Side length of the square board.
pub type GridSize = u8;

/// Count type used for mine counts and total-tile counts.
pub type CellCount = u16;

/// Linear, row-major tile identifier in `0..grid_size²`.
pub type TileIndex = u16;

/// Wager in whole currency units; `0` means demo mode.
pub type BetAmount = u64;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (GridSize, GridSize);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: GridSize, b: GridSize) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Splits a linear index into `(row, col)` for a board of side `grid_size`.
///
/// The caller is responsible for `index < grid_size²`.
pub const fn index_to_coords(index: TileIndex, grid_size: GridSize) -> Coord2 {
    let side = grid_size as TileIndex;
    ((index / side) as GridSize, (index % side) as GridSize)
}

/// Inverse of [`index_to_coords`], `None` when `coords` fall outside the board.
pub const fn coords_to_index(coords: Coord2, grid_size: GridSize) -> Option<TileIndex> {
    let (row, col) = coords;
    if row >= grid_size || col >= grid_size {
        return None;
    }
    Some(row as TileIndex * grid_size as TileIndex + col as TileIndex)
}
