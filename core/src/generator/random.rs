use ndarray::Array2;
use rand::seq::index;

use super::*;

/// Uniform placement of distinct mines, optionally keeping one cell (usually the first
/// click) mine-free.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RandomMinefieldGenerator {
    exclude: Option<Coord2>,
}

impl RandomMinefieldGenerator {
    pub fn new(exclude: Option<Coord2>) -> Self {
        Self { exclude }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate<R: Rng + ?Sized>(self, config: &GameConfig, rng: &mut R) -> Result<MineLayout> {
        config.validate()?;
        let exclude = self
            .exclude
            .map(|coords| config.validate_coords(coords))
            .transpose()?;

        let total_cells = config.total_cells() as usize;
        let mines = config.mines as usize;
        let free_cells = match exclude {
            Some(_) => total_cells - 1,
            None => total_cells,
        };
        if mines > free_cells {
            return Err(GameError::TooManyMines {
                mines: config.mines,
                cells: free_cells as CellCount,
            });
        }

        let excluded_index = exclude.map(|(row, col)| row as usize * config.cols as usize + col as usize);
        let mut mine_mask: Array2<bool> = Array2::default(grid_index(config.size()));
        {
            let cells = mine_mask
                .as_slice_mut()
                .expect("freshly allocated grid has standard layout");
            for mut place in index::sample(rng, free_cells, mines) {
                // shift past the excluded cell so it can never be picked
                if excluded_index.is_some_and(|excluded| place >= excluded) {
                    place += 1;
                }
                cells[place] = true;
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        log::trace!(
            "placed {} mines on {}x{} board (excluded: {:?})",
            layout.mine_count(),
            config.rows,
            config.cols,
            exclude
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn places_exact_mine_count() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = GameConfig::new(9, 9, 10).unwrap();
        for _ in 0..50 {
            let layout = RandomMinefieldGenerator::default()
                .generate(&config, &mut rng)
                .unwrap();
            assert_eq!(layout.mine_count(), 10);
            assert_eq!(layout.size(), (9, 9));
        }
    }

    #[test]
    fn excluded_cell_never_mined() {
        let mut rng = SmallRng::seed_from_u64(11);
        // every cell but the excluded one must be a mine
        let config = GameConfig::new(3, 3, 8).unwrap();
        for _ in 0..20 {
            let layout = RandomMinefieldGenerator::new(Some((1, 2)))
                .generate(&config, &mut rng)
                .unwrap();
            assert!(!layout.contains_mine((1, 2)));
            assert_eq!(layout.mine_count(), 8);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::new(16, 16, 40).unwrap();
        let a = RandomMinefieldGenerator::default()
            .generate(&config, &mut SmallRng::seed_from_u64(3))
            .unwrap();
        let b = RandomMinefieldGenerator::default()
            .generate(&config, &mut SmallRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_out_of_grid_exclusion() {
        let mut rng = SmallRng::seed_from_u64(0);
        let config = GameConfig::new(2, 2, 1).unwrap();
        let err = RandomMinefieldGenerator::new(Some((0, 2)))
            .generate(&config, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GameError::OutOfBounds { .. }));
    }
}
