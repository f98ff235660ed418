// Pixcade
// copyright pixcade contributors 2024～2026

//! Pixcade is a small terminal arcade engine plus the six classic games
//! built on it. Every game is a Model (entities, physics, collisions,
//! scoring, phase machine) and a Render (stateless drawing of the model
//! into cell sprites), driven by a single fixed-rate loop.
//!
//! Games live under `apps/` as separate crates and wire themselves up with
//! the [`arcade_game!`] macro: it generates the `{Name}Game` wrapper, the
//! `init_game` constructor and the `run` entry the binary calls.
//!
//! Rendering goes through individual `Cell`s managed by a `Buffer`; the
//! `Panel` composites tagged sprites into a double buffer and flushes the
//! diff through a terminal adapter. Audio cues are fire-and-forget and the
//! whole audio module degrades to a no-op when no output device exists.

/// framerate per second, set to a moderate number to save CPUs
pub const GAME_FRAME: u32 = 60;

/// Re-export paste for use in macros
pub use paste;

/// arcade_game! wires a game crate together: module declarations, the
/// `{Name}Game` wrapper, `init_game` and the `run` entry used by main.rs.
///
/// ```ignore
/// // apps/snake/src/lib.rs
/// pixcade::arcade_game!(Snake, "snake");
/// ```
#[macro_export]
macro_rules! arcade_game {
    ($name:ident, $id:literal) => {
        mod model;
        mod render;

        use crate::{model::*, render::*};
        use pixcade::game::Game;

        pixcade::paste::paste! {
            pub struct [<$name Game>] {
                pub g: Game<[<$name Model>], [<$name Render>]>,
            }

            pub fn init_game() -> [<$name Game>] {
                let m = [<$name Model>]::new();
                let r = [<$name Render>]::new();
                let mut g = Game::new(m, r, $id);
                g.init();
                [<$name Game>] { g }
            }

            pub fn run() -> std::io::Result<()> {
                let mut g = init_game().g;
                g.run()?;
                g.render.panel.reset(&mut g.context);
                Ok(())
            }
        }
    };
}

/// loading and merging the optional pixcade.toml
pub mod config;

/// public per-game variables: stage, phase, RNG, input, cues, adapter
pub mod context;

/// processing input events, timer and other custom events
pub mod event;

/// integrates model and render, encapsulates the main loop
pub mod game;

/// log
pub mod log;

/// game phase machine shared by every game
pub mod phase;

/// cue kinds and the fire-and-forget cue player
pub mod audio;

/// persisted high-score scalar
pub mod score;

/// common tools and data structures:
/// object pool, RNG, rect and circle overlap, wrap, cadence
pub mod util;

/// Render module for the terminal backend.
/// adapter: render adapter interface plus the crossterm implementation.
/// cell: a base drawing unit i.e. a character.
/// buffer: a vector comprised of cells, managing a screen rectangle.
/// sprite: basic drawing component, a positioned buffer with draw helpers.
/// style: fore- and back-ground colors.
/// panel: composites sprites and flushes diffs through the adapter.
pub mod render;
