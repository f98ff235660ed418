// Pixcade
// copyright pixcade contributors 2024～2026

//! Crossterm backend: raw mode plus alternate screen, diffed cell writes,
//! and conversion of crossterm key events into the unified Event type.
//! `q`, Esc and Ctrl-C request quit from the main loop.

use crate::{
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    render::{
        adapter::{to_error, Adapter},
        buffer::Buffer,
        style::Color,
    },
    util::Rect,
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        Event as CEvent, KeyCode as CKeyCode, KeyEventKind as CKeyEventKind,
        KeyModifiers as CKeyModifiers,
    },
    execute, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
        SetTitle,
    },
};
use std::io::{self, Write};
use std::time::Duration;

pub struct CrosstermAdapter {
    writer: Box<dyn Write>,
    size: Rect,
    active: bool,
}

impl Default for CrosstermAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermAdapter {
    /// construction touches nothing; the terminal is claimed in init
    pub fn new() -> Self {
        Self {
            writer: Box::new(io::stdout()),
            size: Rect::default(),
            active: false,
        }
    }
}

impl Adapter for CrosstermAdapter {
    fn init(&mut self, w: u16, h: u16, title: &str) -> Result<(), String> {
        let (width, height) = to_error(terminal::size())?;
        if w > width || h > height {
            return Err(format!(
                "terminal too small: need {}x{}, have {}x{}",
                w, h, width, height
            ));
        }
        self.size = Rect::new(0, 0, w, h);
        to_error(enable_raw_mode())?;
        to_error(execute!(
            self.writer,
            EnterAlternateScreen,
            SetTitle(title)
        ))?;
        self.active = true;
        Ok(())
    }

    fn reset(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let _ = disable_raw_mode();
        let _ = execute!(self.writer, LeaveAlternateScreen);
        let _ = self.show_cursor();
    }

    fn size(&self) -> Rect {
        self.size
    }

    fn poll_event(&mut self, timeout: Duration, es: &mut Vec<Event>) -> bool {
        if !crossterm::event::poll(timeout).unwrap_or(false) {
            return false;
        }
        let e = match crossterm::event::read() {
            Ok(e) => e,
            Err(_) => return false,
        };
        if let CEvent::Key(key) = &e {
            let ctrl_c = key.code == CKeyCode::Char('c')
                && key.modifiers.contains(CKeyModifiers::CONTROL);
            if ctrl_c || key.code == CKeyCode::Char('q') || key.code == CKeyCode::Esc {
                return true;
            }
        }
        if let Some(et) = input_event_from_cross(&e) {
            es.push(et);
        }
        false
    }

    fn draw_all(&mut self, current: &Buffer, previous: &Buffer) -> Result<(), String> {
        if !self.active {
            return Ok(());
        }
        let updates = previous.diff(current);

        let mut fg = Color::Reset;
        let mut bg = Color::Reset;
        let mut last_pos: Option<(u16, u16)> = None;
        for (x, y, cell) in updates {
            // move the cursor only when the previous write was not the
            // immediate left neighbor
            if !matches!(last_pos, Some(p) if x == p.0 + 1 && y == p.1) {
                to_error(queue!(self.writer, MoveTo(x, y)))?;
            }
            last_pos = Some((x, y));
            if cell.fg != fg {
                to_error(queue!(
                    self.writer,
                    SetForegroundColor(cell.fg.into())
                ))?;
                fg = cell.fg;
            }
            if cell.bg != bg {
                to_error(queue!(
                    self.writer,
                    SetBackgroundColor(cell.bg.into())
                ))?;
                bg = cell.bg;
            }
            to_error(queue!(self.writer, Print(cell.symbol)))?;
        }
        to_error(queue!(
            self.writer,
            SetForegroundColor(crossterm::style::Color::Reset),
            SetBackgroundColor(crossterm::style::Color::Reset)
        ))?;
        to_error(self.writer.flush())
    }

    fn hide_cursor(&mut self) -> Result<(), String> {
        if !self.active {
            return Ok(());
        }
        to_error(execute!(self.writer, Hide))
    }

    fn show_cursor(&mut self) -> Result<(), String> {
        to_error(execute!(self.writer, Show))
    }
}

/// Convert crossterm I/O events to the unified Event, for the sake of
/// unified event processing. Mouse and resize events are not part of the
/// input model and are dropped here.
pub fn input_event_from_cross(e: &CEvent) -> Option<Event> {
    if let CEvent::Key(key) = e {
        let kc = match key.code {
            CKeyCode::Char(cc) => KeyCode::Char(cc),
            CKeyCode::Up => KeyCode::Up,
            CKeyCode::Down => KeyCode::Down,
            CKeyCode::Left => KeyCode::Left,
            CKeyCode::Right => KeyCode::Right,
            CKeyCode::Enter => KeyCode::Enter,
            CKeyCode::Tab => KeyCode::Tab,
            CKeyCode::Backspace => KeyCode::Backspace,
            CKeyCode::Delete => KeyCode::Delete,
            CKeyCode::Esc => KeyCode::Esc,
            CKeyCode::F(n) => KeyCode::F(n),
            _ => return None,
        };
        let kind = match key.kind {
            CKeyEventKind::Press => KeyEventKind::Press,
            CKeyEventKind::Repeat => KeyEventKind::Repeat,
            CKeyEventKind::Release => KeyEventKind::Release,
        };
        let mut mods = KeyModifiers::NONE;
        if key.modifiers.contains(CKeyModifiers::SHIFT) {
            mods |= KeyModifiers::SHIFT;
        }
        if key.modifiers.contains(CKeyModifiers::CONTROL) {
            mods |= KeyModifiers::CONTROL;
        }
        if key.modifiers.contains(CKeyModifiers::ALT) {
            mods |= KeyModifiers::ALT;
        }
        return Some(Event::Key(KeyEvent::new_with_kind(kc, mods, kind)));
    }
    None
}
