/// Terminal cutscene player: the jumpscare that fires on the final crash.
///
/// Plays a built-in reel of ASCII frames stretched to the full terminal
/// at a fixed rate, with the scream cue started alongside. Playback
/// blocks the caller; between frames the input queue is drained and a
/// quit signal aborts the reel. The scream handle is held on the stack
/// for the duration, so the audio stops on the abort path exactly as it
/// does on normal completion.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use super::input::InputState;
use super::renderer::Renderer;
use super::sound::SoundEngine;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CutsceneOutcome {
    Finished,
    /// A quit signal arrived mid-reel; the caller should shut down.
    Interrupted,
}

/// A fixed sequence of ASCII frames with a per-frame hold time.
pub struct Reel {
    pub frames: &'static [&'static [&'static str]],
    pub frame_ms: u64,
}

const POLL_SLEEP: Duration = Duration::from_millis(5);

pub fn play(
    reel: &Reel,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    kb: &mut InputState,
) -> io::Result<CutsceneOutcome> {
    let _scream = sound.and_then(|s| s.start_scream());

    for frame in reel.frames {
        renderer.blit_cutscene(frame)?;

        let deadline = Instant::now() + Duration::from_millis(reel.frame_ms);
        while Instant::now() < deadline {
            kb.drain_events();
            if kb.ctrl_c_pressed() || kb.any_pressed(&[KeyCode::Esc]) {
                return Ok(CutsceneOutcome::Interrupted);
            }
            std::thread::sleep(POLL_SLEEP);
        }
    }

    Ok(CutsceneOutcome::Finished)
}

// ── Built-in jumpscare reel ──

const SKULL_FAR: &[&str] = &[
    "                    ",
    "                    ",
    "        ____        ",
    "       /    \\       ",
    "      | o  o |      ",
    "      |  /\\  |      ",
    "       \\_--_/       ",
    "                    ",
    "                    ",
];

const SKULL_MID: &[&str] = &[
    "                    ",
    "      ________      ",
    "     /        \\     ",
    "    |  O    O  |    ",
    "    |    /\\    |    ",
    "    |   ____   |    ",
    "     \\_|VVVV|_/     ",
    "       |____|       ",
    "                    ",
];

const SKULL_NEAR: &[&str] = &[
    "   ______________   ",
    "  /              \\  ",
    " |   ###    ###   | ",
    " |   ###    ###   | ",
    " |       /\\       | ",
    " |      /  \\      | ",
    "  \\   ________   /  ",
    "   \\_|VV VV VV|_/   ",
    "     |________|     ",
];

const SKULL_FLASH: &[&str] = &[
    "####################",
    "##/##############\\##",
    "#|###@@@####@@@###|#",
    "#|###@@@####@@@###|#",
    "#|#######\\/#######|#",
    "#|######/##\\######|#",
    "##\\###________###/##",
    "###\\#|VV#VV#VV|#/###",
    "#####|########|#####",
];

pub const JUMPSCARE: Reel = Reel {
    frames: &[
        SKULL_FAR,
        SKULL_FAR,
        SKULL_MID,
        SKULL_MID,
        SKULL_NEAR,
        SKULL_FLASH,
        SKULL_NEAR,
        SKULL_FLASH,
        SKULL_NEAR,
        SKULL_FLASH,
        SKULL_NEAR,
        SKULL_NEAR,
    ],
    frame_ms: 120,
};
