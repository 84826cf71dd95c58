/// The fruit: a single cell-aligned position, re-rolled on every pickup.
/// No identity beyond where it sits.

use rand::Rng;

use super::grid::{Grid, Pos};

#[derive(Clone, Copy, Debug)]
pub struct Fruit {
    pub position: Pos,
}

impl Fruit {
    pub fn new(grid: &Grid, rng: &mut impl Rng) -> Self {
        Fruit {
            position: grid.random_cell(rng),
        }
    }

    pub fn respawn(&mut self, grid: &Grid, rng: &mut impl Rng) {
        self.position = grid.random_cell(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn respawn_stays_on_lattice() {
        let g = Grid::new(600, 400, 20, 15);
        let mut rng = StdRng::seed_from_u64(3);
        let mut f = Fruit::new(&g, &mut rng);
        for _ in 0..100 {
            f.respawn(&g, &mut rng);
            assert!(g.in_bounds(f.position));
            assert_eq!((f.position.x - g.min_x) % g.cell, 0);
            assert_eq!((f.position.y - g.min_y) % g.cell, 0);
        }
    }
}
