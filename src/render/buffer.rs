// Pixcade
// copyright pixcade contributors 2024～2026

//! Buffer is a rectangle of cells: the panel's double buffers and every
//! sprite's content are buffers. Out-of-range writes are silently
//! dropped so drawing near an edge needs no caller-side clipping.

use crate::{
    render::{cell::Cell, style::Color},
    util::Rect,
};

#[derive(Debug, Clone, Default)]
pub struct Buffer {
    pub area: Rect,
    pub content: Vec<Cell>,
}

impl Buffer {
    pub fn empty(area: Rect) -> Buffer {
        let size = area.area() as usize;
        Buffer {
            area,
            content: vec![Cell::default(); size],
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// local cell index; None when (x, y) is outside the buffer
    fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.area.width || y >= self.area.height {
            return None;
        }
        Some(y as usize * self.area.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.content[i])
    }

    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index_of(x, y) {
            self.content[i] = cell;
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, symbol: char, fg: Color, bg: Color) {
        self.set_cell(x, y, Cell::new(symbol, fg, bg));
    }

    /// write a string left to right, clipped at the right edge
    pub fn set_str(&mut self, x: u16, y: u16, string: &str, fg: Color, bg: Color) {
        for (i, ch) in string.chars().enumerate() {
            self.set_char(x + i as u16, y, ch, fg, bg);
        }
    }

    pub fn fill(&mut self, symbol: char, fg: Color, bg: Color) {
        let cell = Cell::new(symbol, fg, bg);
        for c in &mut self.content {
            *c = cell;
        }
    }

    pub fn reset(&mut self) {
        for c in &mut self.content {
            c.reset();
        }
    }

    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.content = vec![Cell::default(); area.area() as usize];
    }

    /// composite other at offset (ox, oy); blank cells stay transparent
    pub fn merge_at(&mut self, ox: u16, oy: u16, other: &Buffer) {
        for y in 0..other.area.height {
            for x in 0..other.area.width {
                if let Some(cell) = other.get(x, y) {
                    if !cell.is_blank() {
                        self.set_cell(ox + x, oy + y, *cell);
                    }
                }
            }
        }
    }

    /// Cells of next differing from self, in row-major order; the
    /// terminal flush writes exactly these.
    pub fn diff<'a>(&self, next: &'a Buffer) -> Vec<(u16, u16, &'a Cell)> {
        let mut updates = vec![];
        for y in 0..next.area.height {
            for x in 0..next.area.width {
                let nc = match next.get(x, y) {
                    Some(c) => c,
                    None => continue,
                };
                if self.get(x, y) != Some(nc) {
                    updates.push((x, y, nc));
                }
            }
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut b = Buffer::empty(Rect::new(0, 0, 4, 2));
        b.set_char(9, 0, 'x', Color::Red, Color::Reset);
        b.set_char(0, 9, 'x', Color::Red, Color::Reset);
        assert!(b.content.iter().all(|c| c.is_blank()));
    }

    #[test]
    fn set_str_clips_at_right_edge() {
        let mut b = Buffer::empty(Rect::new(0, 0, 4, 1));
        b.set_str(2, 0, "abcd", Color::Reset, Color::Reset);
        assert_eq!(b.get(2, 0).unwrap().symbol, 'a');
        assert_eq!(b.get(3, 0).unwrap().symbol, 'b');
    }

    #[test]
    fn merge_keeps_blank_cells_transparent() {
        let mut base = Buffer::empty(Rect::new(0, 0, 4, 1));
        base.set_str(0, 0, "####", Color::Reset, Color::Blue);
        let mut over = Buffer::empty(Rect::new(0, 0, 2, 1));
        over.set_char(1, 0, 'x', Color::Red, Color::Reset);
        base.merge_at(0, 0, &over);
        assert_eq!(base.get(0, 0).unwrap().symbol, '#');
        assert_eq!(base.get(1, 0).unwrap().symbol, 'x');
    }

    #[test]
    fn diff_reports_only_changes() {
        let prev = Buffer::empty(Rect::new(0, 0, 4, 1));
        let mut cur = Buffer::empty(Rect::new(0, 0, 4, 1));
        cur.set_char(2, 0, 'z', Color::Green, Color::Reset);
        let d = prev.diff(&cur);
        assert_eq!(d.len(), 1);
        assert_eq!((d[0].0, d[0].1, d[0].2.symbol), (2, 0, 'z'));
    }
}
