// The thin surface the core expects from whatever owns the terminal.
// Rendering and raw keyboard mode are somebody else's problem; the engine
// only ever asks for "draw this glyph here" and "how big is the play area".

use std::io::{Write, stdout};

use crate::arena::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn ansi(self) -> &'static str {
        match self {
            Color::Red => "\x1b[1m\x1b[31m",
            Color::Green => "\x1b[1m\x1b[32m",
            Color::Yellow => "\x1b[1m\x1b[33m",
            Color::Blue => "\x1b[1m\x1b[34m",
        }
    }
}

pub trait Console: Send {
    /// Draw one glyph at a coordinate. Row/col follow grid coordinates.
    fn draw(&mut self, at: crate::arena::Coord, glyph: char, color: Option<Color>);
    /// Width and height of the play area.
    fn size(&self) -> (i32, i32);
    fn flush(&mut self) {}
}

/// Glyph and color per cell kind, as rendered on peers and in local play.
pub fn glyph_for(cell: Cell) -> (char, Option<Color>) {
    match cell {
        Cell::Empty => (' ', None),
        Cell::Wall => ('#', Some(Color::Red)),
        Cell::SnakeA => ('s', Some(Color::Blue)),
        Cell::SnakeB => ('$', Some(Color::Yellow)),
        Cell::Food => ('x', None),
        Cell::PopWall => ('W', None),
        Cell::HighSpeed => ('>', None),
        Cell::LowSpeed => ('<', None),
        Cell::Freeze => ('*', None),
    }
}

/// Does nothing. Used by the authoritative host and by tests.
#[derive(Debug, Clone)]
pub struct NullConsole {
    width: i32,
    height: i32,
}

impl NullConsole {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Console for NullConsole {
    fn draw(&mut self, _at: crate::arena::Coord, _glyph: char, _color: Option<Color>) {}

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

/// Plain ANSI escape renderer. Assumes the caller has already put the
/// terminal into whatever mode it wants; this only moves the cursor and
/// prints.
pub struct AnsiConsole {
    width: i32,
    height: i32,
}

impl AnsiConsole {
    pub fn new(width: i32, height: i32) -> Self {
        // wipe the screen once so stale output doesn't sit under the arena
        print!("\x1b[2J\x1b[?25l");
        Self { width, height }
    }

    pub fn clear(&mut self) {
        print!("\x1b[2J\x1b[?25h\x1b[1;1H");
        let _ = stdout().flush();
    }
}

impl Console for AnsiConsole {
    fn draw(&mut self, at: crate::arena::Coord, glyph: char, color: Option<Color>) {
        if at == crate::arena::Coord::OFF_GRID {
            return;
        }
        match color {
            Some(c) => print!("\x1b[{};{}H{}{}\x1b[0m", at.row, at.col, c.ansi(), glyph),
            None => print!("\x1b[{};{}H{}", at.row, at.col, glyph),
        }
    }

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn flush(&mut self) {
        let _ = stdout().flush();
    }
}

impl Drop for AnsiConsole {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Full repaint of an arena, used right after construction.
pub fn draw_arena(arena: &crate::arena::Arena, console: &mut dyn Console) {
    for row in 0..arena.height() {
        for col in 0..arena.width() {
            let at = crate::arena::Coord::new(row, col);
            let (glyph, color) = glyph_for(arena.cell_at(at));
            console.draw(at, glyph, color);
        }
    }
    console.flush();
}
