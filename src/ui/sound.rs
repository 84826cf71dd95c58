/// Sound engine: procedural sound cues via rodio.
///
/// All cues are generated as in-memory WAV buffers at init time; no media
/// files are read. Playback is fire-and-forget via detached Sinks, except
/// the cutscene scream, which is returned as a handle so it can be cut
/// off when playback is interrupted.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each cue.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_crash: Arc<Vec<u8>>,
        sfx_pickup: Arc<Vec<u8>>,
        sfx_scream: Arc<Vec<u8>>,
    }

    /// Keeps the scream playing while held. Dropping it stops the sound,
    /// so an interrupted cutscene releases the audio the same way a
    /// finished one does.
    pub struct ScreamHandle {
        _sink: Sink,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            let sfx_crash = Arc::new(make_wav(&gen_crash()));
            let sfx_pickup = Arc::new(make_wav(&gen_pickup()));
            let sfx_scream = Arc::new(make_wav(&gen_scream()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_crash,
                sfx_pickup,
                sfx_scream,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        /// Non-terminal boundary hit.
        pub fn play_crash(&self) {
            self.play(&self.sfx_crash);
        }

        /// Fruit pickup blip.
        pub fn play_pickup(&self) {
            self.play(&self.sfx_pickup);
        }

        /// Start the cutscene scream. The sink is NOT detached: the
        /// caller holds the handle for the duration of the cutscene.
        pub fn start_scream(&self) -> Option<ScreamHandle> {
            let sink = Sink::try_new(&self.handle).ok()?;
            let cursor = Cursor::new(self.sfx_scream.as_ref().clone());
            let src = rodio::Decoder::new(cursor).ok()?;
            sink.append(src);
            Some(ScreamHandle { _sink: sink })
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Crash: dull thud, descending tone buried in noise.
    fn gen_crash() -> Vec<f32> {
        let duration = 0.16;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 424242;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 160.0 + (1.0 - t) * 240.0; // descending
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (tone * 0.5 + noise * 0.5) * env * 0.35
            })
            .collect()
    }

    /// Pickup: quick ascending two-note blip.
    fn gen_pickup() -> Vec<f32> {
        let notes = [880.0_f32, 1175.0]; // A5, D6
        let note_dur = 0.05;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                // Sine + 3rd harmonic for a retro edge
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Scream: harsh detuned sawtooth pair sliding down, heavy noise.
    /// Long enough to cover the whole cutscene reel.
    fn gen_scream() -> Vec<f32> {
        let duration = 1.6;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 987654;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let freq = 900.0 - t * 500.0;
                let saw = |f: f32| 2.0 * (ti * f - (ti * f + 0.5).floor());
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // Attack over the first 30ms, slow decay at the tail
                let attack = (t * 50.0).min(1.0);
                let decay = if t > 0.8 { (1.0 - t) / 0.2 } else { 1.0 };
                (saw(freq) * 0.35 + saw(freq * 1.02) * 0.35 + noise * 0.3)
                    * attack * decay * 0.4
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::{ScreamHandle, SoundEngine};

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct ScreamHandle;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }
    pub fn play_crash(&self) {}
    pub fn play_pickup(&self) {}
    pub fn start_scream(&self) -> Option<ScreamHandle> {
        None
    }
}
