use crate::arena::Direction;

/// ESC quits, same as the original binding.
pub const KEY_QUIT: u8 = 27;
/// Maximum directions a player can stack between ticks.
pub const MAX_INPUT_STACK: usize = 5;

/// Capacity-bounded ring buffer of directions with explicit full/empty
/// flags. Oldest input comes out first; new input is refused when full.
#[derive(Debug, Clone)]
pub struct InputQueue {
    data: Vec<Direction>,
    start: usize,
    end: usize,
    full: bool,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "input queue needs room for at least one entry");
        Self {
            data: vec![Direction::Up; capacity],
            start: 0,
            end: 0,
            full: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.start == self.end
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Pushes unless full. Returns whether the direction was taken.
    pub fn push(&mut self, dir: Direction) -> bool {
        if self.full {
            return false;
        }
        self.data[self.end] = dir;
        self.end = (self.end + 1) % self.data.len();
        if self.start == self.end {
            self.full = true;
        }
        true
    }

    pub fn pop(&mut self) -> Option<Direction> {
        if self.is_empty() {
            return None;
        }
        let dir = self.data[self.start];
        self.start = (self.start + 1) % self.data.len();
        self.full = false;
        Some(dir)
    }
}

/// Player 1 movement keys: wasd.
pub fn p1_key_to_dir(key: u8) -> Option<Direction> {
    match key {
        b'w' => Some(Direction::Up),
        b's' => Some(Direction::Down),
        b'a' => Some(Direction::Left),
        b'd' => Some(Direction::Right),
        _ => None,
    }
}

/// Player 2 movement keys: ikjl.
pub fn p2_key_to_dir(key: u8) -> Option<Direction> {
    match key {
        b'i' => Some(Direction::Up),
        b'k' => Some(Direction::Down),
        b'j' => Some(Direction::Left),
        b'l' => Some(Direction::Right),
        _ => None,
    }
}

pub fn is_quit_key(key: u8) -> bool {
    key == KEY_QUIT || key == b'q'
}

/// The per-tick direction resolution every loop uses: oldest queued input if
/// any, otherwise keep going; exact reversals are suppressed because a snake
/// may never turn into its own neck.
pub fn resolve_direction(queue: &mut InputQueue, current: Direction) -> Direction {
    let wanted = queue.pop().unwrap_or(current);
    if wanted == current.opposite() { current } else { wanted }
}
