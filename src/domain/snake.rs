/// The snake: body chain, heading, crash counter, speed.
///
/// Boundary handling is unusual on purpose: the snake does not die on
/// contact. The controller detects the violation with `Grid::in_bounds`
/// and either bumps the crash counter and asks `auto_turn` for a new
/// heading, or triggers the terminal sequence. None of the operations
/// here can fail.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use super::grid::{Grid, Pos};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Total over the 4-element domain: UP↔DOWN, LEFT↔RIGHT.
    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Snake {
    /// Head first, tail last. Never empty.
    pub body: VecDeque<Pos>,
    pub direction: Dir,
    /// Monotonically non-decreasing within a life; reset only on restart.
    pub crashes: u32,
    /// Tick rate in frames per second. Grows on fruit pickup, never shrinks.
    pub speed: f32,
    cell: i32,
}

impl Snake {
    /// Three segments along the top-left of the playfield, heading right.
    /// The chain invariant (adjacent segments one cell apart) holds only
    /// because these exact offsets are used; nothing re-checks it later.
    pub fn new(grid: &Grid, initial_fps: f32) -> Self {
        let c = grid.cell;
        let y = grid.min_y + c * 2;
        let body = VecDeque::from([
            Pos::new(grid.min_x + c * 2, y),
            Pos::new(grid.min_x + c, y),
            Pos::new(grid.min_x, y),
        ]);
        Snake {
            body,
            direction: Dir::Right,
            crashes: 0,
            speed: initial_fps,
            cell: c,
        }
    }

    pub fn head(&self) -> Pos {
        *self.body.front().expect("snake body is never empty")
    }

    /// Position one cell from the head in `dir` (current heading if None).
    /// Pure; may land outside the grid.
    pub fn next_head(&self, dir: Option<Dir>) -> Pos {
        let dir = dir.unwrap_or(self.direction);
        let h = self.head();
        match dir {
            Dir::Up => Pos::new(h.x, h.y - self.cell),
            Dir::Down => Pos::new(h.x, h.y + self.cell),
            Dir::Left => Pos::new(h.x - self.cell, h.y),
            Dir::Right => Pos::new(h.x + self.cell, h.y),
        }
    }

    /// Shift the whole chain one cell forward: new head prepended, tail
    /// dropped. Length is unchanged.
    pub fn advance(&mut self) {
        let new_head = self.next_head(None);
        self.body.push_front(new_head);
        self.body.pop_back();
    }

    /// Duplicate the tail segment. It overlaps the old tail until the
    /// next `advance` pulls the chain apart.
    pub fn grow(&mut self) {
        let tail = *self.body.back().expect("snake body is never empty");
        self.body.push_back(tail);
    }

    pub fn crash(&mut self) {
        self.crashes += 1;
    }

    /// Pick a new safe heading after a boundary hit.
    ///
    /// Visits the four directions in random order, skips the one directly
    /// opposite the current heading (no instant U-turn), and takes the
    /// first whose next head stays in bounds. When no direction qualifies
    /// (corner-adjacent deadlock) the heading is left unchanged and the
    /// next tick will crash again; that degenerate case is intended.
    pub fn auto_turn(&mut self, grid: &Grid, rng: &mut impl Rng) {
        let mut candidates = Dir::ALL;
        candidates.shuffle(rng);
        for d in candidates {
            if d == self.direction.opposite() {
                continue;
            }
            if grid.in_bounds(self.next_head(Some(d))) {
                self.direction = d;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid() -> Grid {
        Grid::new(600, 400, 20, 15)
    }

    fn snake_at(head: Pos, dir: Dir) -> Snake {
        let mut s = Snake::new(&grid(), 8.0);
        s.body = VecDeque::from([head]);
        s.direction = dir;
        s
    }

    #[test]
    fn opposite_is_an_involution() {
        for d in Dir::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn next_head_steps_one_cell() {
        let s = snake_at(Pos::new(55, 55), Dir::Right);
        assert_eq!(s.next_head(None), Pos::new(75, 55));
        assert_eq!(s.next_head(Some(Dir::Up)), Pos::new(55, 35));
        assert_eq!(s.next_head(Some(Dir::Down)), Pos::new(55, 75));
        assert_eq!(s.next_head(Some(Dir::Left)), Pos::new(35, 55));
    }

    #[test]
    fn advance_preserves_length() {
        let mut s = Snake::new(&grid(), 8.0);
        let len = s.body.len();
        let expected_head = s.next_head(None);
        s.advance();
        assert_eq!(s.body.len(), len);
        assert_eq!(s.head(), expected_head);
    }

    #[test]
    fn grow_appends_tail_duplicate() {
        let mut s = Snake::new(&grid(), 8.0);
        let head = s.head();
        let tail = *s.body.back().unwrap();
        s.grow();
        assert_eq!(s.body.len(), 4);
        assert_eq!(s.head(), head);
        assert_eq!(*s.body.back().unwrap(), tail);
    }

    #[test]
    fn crash_increments_counter() {
        let mut s = Snake::new(&grid(), 8.0);
        s.crash();
        s.crash();
        assert_eq!(s.crashes, 2);
    }

    #[test]
    fn auto_turn_never_picks_reverse() {
        let g = grid();
        // Mid-field heading right: every direction except Left is legal
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut s = snake_at(Pos::new(255, 155), Dir::Right);
            s.auto_turn(&g, &mut rng);
            assert_ne!(s.direction, Dir::Left);
            assert!(g.in_bounds(s.next_head(None)));
        }
    }

    #[test]
    fn auto_turn_escapes_left_wall() {
        let g = grid();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut s = snake_at(Pos::new(15, 55), Dir::Left);
            s.auto_turn(&g, &mut rng);
            // Right is opposite (skipped); Up/Down are the only escapes
            assert!(s.direction == Dir::Up || s.direction == Dir::Down);
        }
    }

    #[test]
    fn auto_turn_deadlock_keeps_heading() {
        // Single-cell playfield: 2*padding + cell wide → min == max
        let g = Grid::new(50, 50, 20, 15);
        assert_eq!(g.min_x, g.max_x);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut s = snake_at(Pos::new(15, 15), Dir::Right);
            s.auto_turn(&g, &mut rng);
            assert_eq!(s.direction, Dir::Right);
        }
    }
}
