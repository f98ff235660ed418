// Pixcade
// copyright pixcade contributors 2024～2026

//! The render adapter seam: everything the engine needs from a concrete
//! backend. The default backend is crossterm; a backend failing to
//! initialize turns later draw calls into silent no-ops for this game
//! instance instead of propagating errors through every frame.

use crate::{event::Event, render::buffer::Buffer, util::Rect};
use std::{io, time::Duration};

pub mod cross;

/// map io errors into the adapter's string error space
pub fn to_error<T>(r: io::Result<T>) -> Result<T, String> {
    r.map_err(|e| e.to_string())
}

pub trait Adapter {
    /// claim the screen at w x h cells; failing leaves the adapter inert
    fn init(&mut self, w: u16, h: u16, title: &str) -> Result<(), String>;

    /// release the screen; idempotent, called on teardown
    fn reset(&mut self);

    fn size(&self) -> Rect;

    /// Poll one backend event into es, waiting at most timeout.
    /// Returns true when the user asked to quit the game.
    fn poll_event(&mut self, timeout: Duration, es: &mut Vec<Event>) -> bool;

    /// flush the diff between previous and current buffer to the screen
    fn draw_all(&mut self, current: &Buffer, previous: &Buffer) -> Result<(), String>;

    fn hide_cursor(&mut self) -> Result<(), String>;
    fn show_cursor(&mut self) -> Result<(), String>;
}
