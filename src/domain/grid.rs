/// Playfield geometry.
///
/// The domain works in logical units: a width×height field (default
/// 600×400) with a fixed cell quantum and a padding rim. Every entity
/// position is `min + k * cell` on each axis. The renderer maps logical
/// cells to terminal columns; nothing in the domain knows about the
/// terminal.

use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }
}

/// Immutable playfield bounds. Fixed for the process lifetime.
///
/// `min = padding`, `max = dimension - padding - cell` on each axis,
/// both inclusive. Note `max` need not itself be on the cell lattice
/// (600 wide, padding 15, cell 20 gives max_x = 565 while the last
/// reachable column is 555); `in_bounds` is a pure interval test and
/// reachability is the snake's problem.
#[derive(Clone, Copy, Debug)]
pub struct Grid {
    pub cell: i32,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell: i32, padding: i32) -> Self {
        Grid {
            cell,
            min_x: padding,
            max_x: width - padding - cell,
            min_y: padding,
            max_y: height - padding - cell,
        }
    }

    /// Closed-interval membership test on both axes.
    pub fn in_bounds(&self, p: Pos) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Uniformly random cell-aligned position inside the bounds.
    /// Deliberately does NOT exclude cells occupied by the snake;
    /// fruit may legally spawn under it.
    pub fn random_cell(&self, rng: &mut impl Rng) -> Pos {
        let kx = rng.gen_range(0..=(self.max_x - self.min_x) / self.cell);
        let ky = rng.gen_range(0..=(self.max_y - self.min_y) / self.cell);
        Pos::new(self.min_x + kx * self.cell, self.min_y + ky * self.cell)
    }

    /// Number of reachable columns on the cell lattice.
    pub fn cols(&self) -> i32 {
        (self.max_x - self.min_x) / self.cell + 1
    }

    /// Number of reachable rows on the cell lattice.
    pub fn rows(&self) -> i32 {
        (self.max_y - self.min_y) / self.cell + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid() -> Grid {
        // 600×400, cell 20, padding 15 → min 15, max_x 565, max_y 365
        Grid::new(600, 400, 20, 15)
    }

    #[test]
    fn bounds_are_closed_intervals() {
        let g = grid();
        assert!(g.in_bounds(Pos::new(15, 15)));
        assert!(g.in_bounds(Pos::new(565, 365)));
        assert!(g.in_bounds(Pos::new(565, 15)));
        // One cell beyond either edge is out
        assert!(!g.in_bounds(Pos::new(-5, 55)));
        assert!(!g.in_bounds(Pos::new(585, 55)));
        assert!(!g.in_bounds(Pos::new(55, -5)));
        assert!(!g.in_bounds(Pos::new(55, 385)));
    }

    #[test]
    fn random_cell_aligned_and_inside() {
        let g = grid();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = g.random_cell(&mut rng);
            assert!(g.in_bounds(p));
            assert_eq!((p.x - g.min_x) % g.cell, 0);
            assert_eq!((p.y - g.min_y) % g.cell, 0);
        }
    }

    #[test]
    fn lattice_dimensions() {
        let g = grid();
        assert_eq!(g.cols(), 28);
        assert_eq!(g.rows(), 18);
    }
}
