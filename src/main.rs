/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::ThreadRng;

use config::GameConfig;
use domain::snake::Dir;
use sim::event::GameEvent;
use sim::session::{GameSession, Phase};
use ui::cutscene::{self, CutsceneOutcome};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let mut rng = rand::thread_rng();
    let mut session = GameSession::new(&config, &mut rng);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &mut rng);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Snake but Reversed!");
    println!(
        "Final length: {}  Crashes: {}",
        session.snake.body.len(),
        session.snake.crashes
    );
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];

fn game_loop(
    session: &mut GameSession,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    rng: &mut ThreadRng,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();

        // Quit signal works in every state
        if kb.ctrl_c_pressed() || kb.any_pressed(&[KeyCode::Esc]) {
            break;
        }

        match session.phase {
            Phase::Playing => {
                if let Some(dir) = detect_press(&kb) {
                    session.steer(dir);
                }
            }
            Phase::GameOver => {
                if kb.any_pressed(KEYS_QUIT) {
                    break;
                }
                if kb.any_pressed(KEYS_RESTART) {
                    session.restart(rng);
                    last_tick = Instant::now();
                }
            }
        }

        // Pacing follows the snake's current speed, so the game
        // accelerates as it eats.
        if session.phase == Phase::Playing && last_tick.elapsed() >= session.tick_rate() {
            let events = session.step(rng);
            if process_events(&events, session, renderer, sound, &mut kb)? {
                break;
            }
            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Map simulation events to sound and the cutscene.
/// Returns true when the loop should exit (cutscene interrupted by quit).
fn process_events(
    events: &[GameEvent],
    session: &GameSession,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    kb: &mut InputState,
) -> Result<bool, Box<dyn std::error::Error>> {
    debug_assert!(events.len() <= 1, "one tick emits at most one event");
    for event in events {
        match event {
            GameEvent::Crashed { .. } => {
                if let Some(sfx) = sound {
                    sfx.play_crash();
                }
            }
            GameEvent::FruitEaten { .. } => {
                if let Some(sfx) = sound {
                    sfx.play_pickup();
                }
            }
            GameEvent::FinalCrash => {
                // Blocks the loop; session is already in GameOver
                debug_assert_eq!(session.phase, Phase::GameOver);
                let outcome = cutscene::play(&cutscene::JUMPSCARE, renderer, sound, kb)?;
                if outcome == CutsceneOutcome::Interrupted {
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}

fn detect_press(kb: &InputState) -> Option<Dir> {
    if kb.any_pressed(KEYS_UP) {
        Some(Dir::Up)
    } else if kb.any_pressed(KEYS_DOWN) {
        Some(Dir::Down)
    } else if kb.any_pressed(KEYS_LEFT) {
        Some(Dir::Left)
    } else if kb.any_pressed(KEYS_RIGHT) {
        Some(Dir::Right)
    } else {
        None
    }
}
