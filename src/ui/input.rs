/// Input state tracker.
///
/// Drains the terminal event queue once per frame without blocking and
/// exposes edge-triggered press queries. Steering, quit and restart are
/// all one-shot actions here, so only fresh presses matter; a key only
/// re-fires after it is considered released.
///
/// Terminals that don't report Release events get a timeout-based
/// fallback: a key with no Press/Repeat for a while counts as released.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// After this duration without a Press/Repeat event, consider the key released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
                match key.kind {
                    KeyEventKind::Release => {
                        self.last_active.remove(&key.code);
                    }
                    _ => {
                        let was_held = self.is_held(key.code);
                        self.last_active.insert(key.code, Instant::now());
                        if !was_held {
                            self.fresh_presses.push(key.code);
                        }
                    }
                }
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active
            .retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame carried Ctrl+C.
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
