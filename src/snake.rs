use std::collections::VecDeque;

use anyhow::{Result, bail};

use crate::arena::{Arena, Coord, Direction, SnakeKind};

/// Number of predefined symmetric start slots.
pub const START_SLOTS: usize = 12;

/// One snake. The body deque holds coordinates oldest-first: front is the
/// tail, back is the head, consecutive entries are always adjacent.
#[derive(Debug, Clone)]
pub struct Snake {
    kind: SnakeKind,
    body: VecDeque<Coord>,
    pub dir: Direction,
    grow_pending: bool,
}

impl Snake {
    /// Places a new length-1 snake at one of the twelve start slots and
    /// writes its head into the grid.
    pub fn at_slot(kind: SnakeKind, slot: usize, arena: &mut Arena) -> Result<Self> {
        let (head, dir) = start_slot(slot, arena.width(), arena.height())?;
        let mut snake = Self {
            kind,
            body: VecDeque::new(),
            dir,
            grow_pending: false,
        };
        snake.push_head(arena, head);
        Ok(snake)
    }

    pub fn kind(&self) -> SnakeKind {
        self.kind
    }

    pub fn head(&self) -> Coord {
        // body is never empty: at_slot pushes the head and pop_tail is only
        // reached after push_head within a move
        *self.body.back().expect("snake body is never empty")
    }

    pub fn tail(&self) -> Coord {
        *self.body.front().expect("snake body is never empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn grow_pending(&self) -> bool {
        self.grow_pending
    }

    pub fn set_grow_pending(&mut self, grow: bool) {
        self.grow_pending = grow;
    }

    /// Appends a new head and mirrors it into the grid. The grid cell at the
    /// head always carries this snake's kind afterwards, fatal move or not.
    pub fn push_head(&mut self, arena: &mut Arena, head: Coord) {
        self.body.push_back(head);
        arena.set_cell(head, self.kind.cell());
    }

    /// Removes the tail segment and clears its grid cell. Returns the freed
    /// coordinate so the caller can erase the glyph.
    pub fn pop_tail(&mut self, arena: &mut Arena) -> Coord {
        let tail = self.tail();
        self.body.pop_front();
        arena.set_cell(tail, crate::arena::Cell::Empty);
        tail
    }
}

/// The twelve symmetric start positions, expressed as fractions of the play
/// area. Float math then truncation, matching how the board was originally
/// laid out so replicas agree on placement.
pub fn start_slot(slot: usize, width: i32, height: i32) -> Result<(Coord, Direction)> {
    let h = |f: f32| (height as f32 * f) as i32;
    let w = |f: f32| (width as f32 * f) as i32;
    let (coord, dir) = match slot {
        0 => (Coord::new(h(0.5), w(0.2)), Direction::Right),
        1 => (Coord::new(h(0.5), w(0.8)), Direction::Left),
        2 => (Coord::new(h(0.2), w(0.5)), Direction::Down),
        3 => (Coord::new(h(0.8), w(0.5)), Direction::Up),
        4 => (Coord::new(h(0.5) + 2, w(0.2) - 2), Direction::Right),
        5 => (Coord::new(h(0.5) - 2, w(0.8) + 2), Direction::Left),
        6 => (Coord::new(h(0.2) - 2, w(0.5) - 2), Direction::Down),
        7 => (Coord::new(h(0.8) + 2, w(0.5) + 2), Direction::Up),
        8 => (Coord::new(h(0.5) - 2, w(0.2) - 2), Direction::Right),
        9 => (Coord::new(h(0.5) + 2, w(0.8) + 2), Direction::Left),
        10 => (Coord::new(h(0.2) - 2, w(0.5) + 2), Direction::Down),
        11 => (Coord::new(h(0.8) + 2, w(0.5) - 2), Direction::Up),
        _ => bail!("start slot {slot} out of range (0..{START_SLOTS})"),
    };
    Ok((coord, dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Cell;

    #[test]
    fn new_snake_has_length_one_and_marks_the_grid() {
        let mut arena = Arena::new(60, 25);
        let snake = Snake::at_slot(SnakeKind::A, 0, &mut arena).unwrap();
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());
        assert_eq!(arena.cell_at(snake.head()), Cell::SnakeA);
        assert_eq!(snake.dir, Direction::Right);
    }

    #[test]
    fn start_slots_are_distinct_and_inside_the_ring() {
        let arena = Arena::new(60, 25);
        let mut seen = Vec::new();
        for slot in 0..START_SLOTS {
            let (c, _) = start_slot(slot, arena.width(), arena.height()).unwrap();
            assert!(
                c.row > 1 && c.row < arena.height() - 1 && c.col > 1 && c.col < arena.width() - 1,
                "slot {slot} at {c:?} is not inside the walls"
            );
            assert!(!seen.contains(&c), "slot {slot} collides with another slot");
            seen.push(c);
        }
    }

    #[test]
    fn start_slot_rejects_out_of_range() {
        assert!(start_slot(12, 60, 25).is_err());
    }

    #[test]
    fn pop_tail_clears_the_grid_cell() {
        let mut arena = Arena::new(60, 25);
        let mut snake = Snake::at_slot(SnakeKind::B, 1, &mut arena).unwrap();
        let head = snake.head();
        snake.push_head(&mut arena, head.step(Direction::Left));
        assert_eq!(snake.len(), 2);
        let freed = snake.pop_tail(&mut arena);
        assert_eq!(freed, head);
        assert_eq!(arena.cell_at(head), Cell::Empty);
        assert_eq!(snake.len(), 1);
    }
}
