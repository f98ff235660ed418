// Pixcade
// copyright pixcade contributors 2024～2026

//! Context carries the per-game public state every step reads: the frame
//! stage counter, the phase machine, an RNG, the input-state buffer, the
//! cue player and the render adapter. One Context per game instance;
//! nothing in it is shared across games.

use crate::{
    audio::{Audio, Cue, CuePlayer, CueSeq, NullCues},
    config::ArcadeConfig,
    event::{Event, InputState},
    phase::{Phase, PhaseEvent},
    render::adapter::{cross::CrosstermAdapter, Adapter},
    util::Rand,
};

pub struct Context {
    pub game_name: String,
    pub stage: u32,
    pub phase: Phase,
    pub rand: Rand,
    pub input: InputState,
    pub input_events: Vec<Event>,
    pub config: ArcadeConfig,
    pub cues: Box<dyn CuePlayer>,
    pub adapter: Box<dyn Adapter>,
}

impl Context {
    pub fn new(name: &str) -> Self {
        let config = ArcadeConfig::load();
        let cues: Box<dyn CuePlayer> = if config.sound {
            Box::new(Audio::new())
        } else {
            Box::new(NullCues)
        };
        Self {
            game_name: name.to_string(),
            stage: 0,
            phase: Phase::Ready,
            rand: Rand::new(),
            input: InputState::new(),
            input_events: vec![],
            config,
            cues,
            adapter: Box::new(CrosstermAdapter::new()),
        }
    }

    /// fold pending backend events into the held-key state and age it;
    /// the events stay in input_events for the step's edge handling
    pub fn absorb_input(&mut self, dt: f32) {
        for e in &self.input_events {
            self.input.apply(e);
        }
        self.input.tick(dt);
    }

    /// drive the phase machine; invalid events for the phase are no-ops
    pub fn phase_event(&mut self, ev: PhaseEvent) {
        self.phase = self.phase.apply(ev);
    }

    pub fn play(&mut self, cue: Cue) {
        self.cues.play(cue);
    }

    pub fn play_seq(&mut self, seq: &CueSeq) {
        self.cues.play_seq(seq);
    }
}
