use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use rand::rngs::SmallRng;

use super::*;

/// Seeded, uniform mine placement with no constraints besides the mine count.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    sampling: Sampling,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, sampling: Sampling) -> Self {
        Self { seed, sampling }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, grid_size: GridSize, mine_count: CellCount) -> MineLayout {
        use rand::prelude::*;

        let total_tiles = mult(grid_size, grid_size);

        // optimize for full and empty boards
        if mine_count >= total_tiles {
            if mine_count > total_tiles {
                log::warn!(
                    "Board already full, generated anyway, requested {} but only fits {}",
                    mine_count,
                    total_tiles
                );
            }
            return MineLayout::full(grid_size);
        }
        if mine_count == 0 {
            return MineLayout::empty(grid_size);
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mine_indices = match self.sampling {
            Sampling::Rejection => sample_rejection(&mut rng, total_tiles, mine_count),
            Sampling::PartialShuffle => sample_partial_shuffle(&mut rng, total_tiles, mine_count),
        };

        let mut layout = MineLayout::empty(grid_size);
        for index in mine_indices {
            layout.place_mine(index);
        }

        // double check mine count
        if layout.mine_count() != mine_count {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                mine_count
            );
        }
        log::trace!(
            "Generated {:?} layout with seed {}: {:?}",
            self.sampling,
            self.seed,
            layout.mine_indices().collect::<Vec<_>>()
        );
        layout
    }
}

fn sample_rejection(
    rng: &mut SmallRng,
    total_tiles: CellCount,
    mine_count: CellCount,
) -> Vec<TileIndex> {
    use rand::prelude::*;

    let mut picked = BTreeSet::new();
    while picked.len() < usize::from(mine_count) {
        picked.insert(rng.random_range(0..total_tiles));
    }
    picked.into_iter().collect()
}

fn sample_partial_shuffle(
    rng: &mut SmallRng,
    total_tiles: CellCount,
    mine_count: CellCount,
) -> Vec<TileIndex> {
    use rand::prelude::*;

    let mine_count = usize::from(mine_count);
    let mut pool: Vec<TileIndex> = (0..total_tiles).collect();
    for i in 0..mine_count {
        let j = rng.random_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(mine_count);
    pool
}
