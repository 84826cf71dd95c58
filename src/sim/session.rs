/// GameSession: the state machine driving one discrete tick per frame.
///
/// Two phases only. `step` runs the simulation in Playing and is a no-op
/// in GameOver; the main loop handles quit/restart input for GameOver and
/// forwards directional presses through `steer` while Playing.
///
/// Tick order per frame: read input (main loop) → reverse-map it (`steer`)
/// → attempt move → resolve collision → resolve fruit pickup → resolve
/// terminal condition. A boundary hit consumes the whole tick: the snake
/// does not move on a crash frame.

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::fruit::Fruit;
use crate::domain::grid::Grid;
use crate::domain::snake::{Dir, Snake};

use super::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
}

pub struct GameSession {
    pub grid: Grid,
    pub snake: Snake,
    pub fruit: Fruit,
    pub phase: Phase,
    pub max_crashes: u32,
    pub initial_fps: f32,
}

impl GameSession {
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let grid = Grid::new(
            config.grid.width,
            config.grid.height,
            config.grid.block_size,
            config.grid.padding,
        );
        GameSession {
            grid,
            snake: Snake::new(&grid, config.game.initial_fps),
            fruit: Fruit::new(&grid, rng),
            phase: Phase::Playing,
            max_crashes: config.game.max_crashes,
            initial_fps: config.game.initial_fps,
        }
    }

    /// Discard snake and fruit, back to Playing with initial crash count
    /// and speed. Explicit transition, never a re-entrant loop call.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        self.snake = Snake::new(&self.grid, self.initial_fps);
        self.fruit = Fruit::new(&self.grid, rng);
        self.phase = Phase::Playing;
    }

    /// Reversed controls. The guard compares the *pressed* key's nominal
    /// direction against the current heading, while the effect applied is
    /// its opposite. The asymmetry is deliberate: pressing the key that
    /// names the current heading does nothing, and pressing its mirror
    /// can be a no-op too (heading Right, press Left → assign Right).
    pub fn steer(&mut self, pressed: Dir) {
        if self.phase != Phase::Playing {
            return;
        }
        if pressed != self.snake.direction {
            self.snake.direction = pressed.opposite();
        }
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self, rng: &mut impl Rng) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return vec![];
        }

        let mut events = Vec::new();
        let next = self.snake.next_head(None);

        if !self.grid.in_bounds(next) {
            // Crash frame: counter bump, no movement
            self.snake.crash();
            if self.snake.crashes >= self.max_crashes {
                self.phase = Phase::GameOver;
                events.push(GameEvent::FinalCrash);
            } else {
                self.snake.auto_turn(&self.grid, rng);
                events.push(GameEvent::Crashed {
                    crashes: self.snake.crashes,
                });
            }
        } else {
            self.snake.advance();
            if self.snake.head() == self.fruit.position {
                self.snake.grow();
                self.fruit.respawn(&self.grid, rng);
                // The sole speed rule: /0.75 per pickup, reset on restart
                self.snake.speed /= 0.75;
                events.push(GameEvent::FruitEaten {
                    speed: self.snake.speed,
                });
            }
        }

        events
    }

    /// Tick interval for the pacing delay, clamped to at least 1 fps.
    pub fn tick_rate(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f32(1.0 / self.snake.speed.max(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Pos;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn session(rng: &mut StdRng) -> GameSession {
        GameSession::new(&GameConfig::default(), rng)
    }

    fn place_snake(s: &mut GameSession, head: Pos, dir: Dir) {
        s.snake.body = VecDeque::from([head]);
        s.snake.direction = dir;
    }

    #[test]
    fn crash_frame_bumps_counter_and_holds_position() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut s = session(&mut rng);
        // Head at the left wall, heading into it: next head is (-5, 55)
        place_snake(&mut s, Pos::new(15, 55), Dir::Left);
        let events = s.step(&mut rng);
        assert_eq!(s.snake.crashes, 1);
        assert_eq!(s.snake.head(), Pos::new(15, 55));
        assert_eq!(s.phase, Phase::Playing);
        assert!(matches!(events[..], [GameEvent::Crashed { crashes: 1 }]));
        // Auto-turn ran: the new heading escapes the wall
        assert!(s.grid.in_bounds(s.snake.next_head(None)));
    }

    #[test]
    fn fifth_crash_is_terminal() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut s = session(&mut rng);
        for n in 1..s.max_crashes {
            // Re-aim into the wall each tick; auto-turn keeps rescuing it
            place_snake(&mut s, Pos::new(15, 55), Dir::Left);
            let events = s.step(&mut rng);
            assert_eq!(s.snake.crashes, n);
            assert_eq!(s.phase, Phase::Playing, "crash {n} must not be terminal");
            assert!(matches!(events[..], [GameEvent::Crashed { .. }]));
        }
        place_snake(&mut s, Pos::new(15, 55), Dir::Left);
        let events = s.step(&mut rng);
        assert_eq!(s.snake.crashes, 5);
        assert_eq!(s.phase, Phase::GameOver);
        assert!(matches!(events[..], [GameEvent::FinalCrash]));
        // Snake did not move on the terminal frame either
        assert_eq!(s.snake.head(), Pos::new(15, 55));
    }

    #[test]
    fn no_simulation_after_game_over() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = session(&mut rng);
        s.phase = Phase::GameOver;
        let head = s.snake.head();
        assert!(s.step(&mut rng).is_empty());
        assert_eq!(s.snake.head(), head);
    }

    #[test]
    fn pickup_grows_respawns_and_speeds_up() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut s = session(&mut rng);
        place_snake(&mut s, Pos::new(35, 55), Dir::Right);
        s.fruit.position = Pos::new(55, 55);
        let s0 = s.snake.speed;
        let events = s.step(&mut rng);
        assert_eq!(s.snake.head(), Pos::new(55, 55));
        assert_eq!(s.snake.body.len(), 2);
        assert!((s.snake.speed - s0 * 4.0 / 3.0).abs() < 1e-4);
        assert!(s.grid.in_bounds(s.fruit.position));
        assert!(matches!(events[..], [GameEvent::FruitEaten { .. }]));
    }

    #[test]
    fn speed_compounds_per_pickup() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = session(&mut rng);
        let s0 = s.snake.speed;
        for _ in 0..5 {
            s.fruit.position = s.snake.next_head(None);
            s.step(&mut rng);
        }
        let expected = s0 * (4.0_f32 / 3.0).powi(5);
        assert!((s.snake.speed - expected).abs() < 1e-3);
    }

    #[test]
    fn speed_unchanged_by_moves_and_crashes() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut s = session(&mut rng);
        s.fruit.position = Pos::new(555, 355); // far corner, out of the way
        let s0 = s.snake.speed;
        for _ in 0..3 {
            s.step(&mut rng);
        }
        place_snake(&mut s, Pos::new(15, 55), Dir::Left);
        s.step(&mut rng);
        assert_eq!(s.snake.crashes, 1);
        assert_eq!(s.snake.speed, s0);
    }

    #[test]
    fn steer_guard_asymmetry() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut s = session(&mut rng);
        assert_eq!(s.snake.direction, Dir::Right);

        // Pressing the key naming the current heading is ignored
        s.steer(Dir::Right);
        assert_eq!(s.snake.direction, Dir::Right);

        // Press Left while heading Right: guard passes, opposite of Left
        // is Right, so the heading is effectively unchanged
        s.steer(Dir::Left);
        assert_eq!(s.snake.direction, Dir::Right);

        // Press Up while heading Right → heading becomes Down
        s.steer(Dir::Up);
        assert_eq!(s.snake.direction, Dir::Down);

        // Press Down while heading Down is ignored (would assign Up)
        s.steer(Dir::Down);
        assert_eq!(s.snake.direction, Dir::Down);
    }

    #[test]
    fn steer_ignored_in_game_over() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut s = session(&mut rng);
        s.phase = Phase::GameOver;
        let dir = s.snake.direction;
        s.steer(Dir::Up);
        assert_eq!(s.snake.direction, dir);
    }

    #[test]
    fn restart_resets_crashes_speed_and_phase() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = session(&mut rng);
        s.snake.crashes = 5;
        s.snake.speed = 30.0;
        s.snake.grow();
        s.phase = Phase::GameOver;
        s.restart(&mut rng);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.snake.crashes, 0);
        assert_eq!(s.snake.speed, s.initial_fps);
        assert_eq!(s.snake.body.len(), 3);
    }

    #[test]
    fn tick_rate_clamps_to_one_fps() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut s = session(&mut rng);
        s.snake.speed = 0.25;
        assert_eq!(s.tick_rate(), std::time::Duration::from_secs(1));
        s.snake.speed = 8.0;
        assert_eq!(s.tick_rate(), std::time::Duration::from_secs_f32(0.125));
    }
}
