// Pixcade
// copyright pixcade contributors 2024～2026

//! Fire-and-forget audio cues. Games never schedule sounds themselves:
//! they emit a single Cue (or a declarative sequence of delay/cue pairs)
//! and the player interprets it on its own time. No acknowledgement, no
//! ordering guarantee against the step that triggered it.
//!
//! The default backend synthesizes short tones through rodio on a worker
//! thread; the output stream lives and dies inside that thread. When no
//! output device exists every call degrades to a logged no-op.

#[cfg(feature = "audio")]
use rodio::{source::SineWave, OutputStreamBuilder, Source};
#[cfg(feature = "audio")]
use std::thread;
#[cfg(feature = "audio")]
use std::time::Duration;

/// The cue vocabulary across the cabinet; each game uses a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Move,
    Rotate,
    Drop,
    LineClear,
    GameOver,
    Shoot,
    Explosion,
    Hit,
    LevelUp,
    Bonus,
}

/// A declarative multi-tone request: seconds to wait, then the cue.
pub type CueSeq = [(f32, Cue)];

pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
    fn play_seq(&mut self, seq: &CueSeq);
}

/// Cue player that swallows everything; used when sound is off in the
/// config and in tests.
#[derive(Default)]
pub struct NullCues;

impl CuePlayer for NullCues {
    fn play(&mut self, _cue: Cue) {}
    fn play_seq(&mut self, _seq: &CueSeq) {}
}

/// tones per cue: (frequency hz, duration s)
#[cfg(feature = "audio")]
fn tones_of(cue: Cue) -> &'static [(f32, f32)] {
    match cue {
        Cue::Move => &[(220.0, 0.03)],
        Cue::Rotate => &[(330.0, 0.04)],
        Cue::Drop => &[(150.0, 0.08)],
        Cue::LineClear => &[(440.0, 0.08), (660.0, 0.08), (880.0, 0.12)],
        Cue::GameOver => &[(392.0, 0.15), (330.0, 0.15), (262.0, 0.30)],
        Cue::Shoot => &[(880.0, 0.05)],
        Cue::Explosion => &[(110.0, 0.20)],
        Cue::Hit => &[(520.0, 0.05)],
        Cue::LevelUp => &[(523.0, 0.10), (784.0, 0.15)],
        Cue::Bonus => &[(660.0, 0.06), (990.0, 0.08)],
    }
}

/// rodio-backed cue player
#[derive(Default)]
pub struct Audio;

impl Audio {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "audio")]
impl CuePlayer for Audio {
    fn play(&mut self, cue: Cue) {
        self.play_seq(&[(0.0, cue)]);
    }

    fn play_seq(&mut self, seq: &CueSeq) {
        let seq: Vec<(f32, Cue)> = seq.to_vec();
        thread::spawn(move || {
            // the stream is bound to this thread; it is kept alive by
            // sleeping out the tone durations and dropped afterwards
            let stream = match OutputStreamBuilder::open_default_stream() {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("audio unavailable, cue dropped: {}", e);
                    return;
                }
            };
            for (delay, cue) in seq {
                if delay > 0.0 {
                    thread::sleep(Duration::from_secs_f32(delay));
                }
                let mut total = 0.0f32;
                for &(freq, dur) in tones_of(cue) {
                    let src = SineWave::new(freq)
                        .take_duration(Duration::from_secs_f32(dur))
                        .amplify(0.20)
                        .delay(Duration::from_secs_f32(total));
                    stream.mixer().add(src);
                    total += dur;
                }
                thread::sleep(Duration::from_secs_f32(total));
            }
        });
    }
}

#[cfg(not(feature = "audio"))]
impl CuePlayer for Audio {
    fn play(&mut self, _cue: Cue) {}
    fn play_seq(&mut self, _seq: &CueSeq) {}
}
