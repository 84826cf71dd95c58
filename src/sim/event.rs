/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and the cutscene.

#[derive(Clone, Copy, Debug)]
pub enum GameEvent {
    /// Non-terminal boundary hit: counter bumped, auto-turn taken.
    Crashed { crashes: u32 },
    /// The crash that reached the threshold. The main loop plays the
    /// blocking cutscene; the session is already in GameOver.
    FinalCrash,
    /// Fruit picked up: snake grew, speed increased, fruit respawned.
    FruitEaten { speed: f32 },
}
