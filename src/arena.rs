// Grid model: coordinates, directions, cell contents and the arena itself.
// The arena owns the only mutable board state there is: the cell buffer,
// the global speed bias and the per-snake freeze counters.

use serde::{Deserialize, Serialize};

/// Microseconds added to / removed from the tick sleep per speed item.
pub const SPEED_STEP_US: i32 = 25_000;
/// Spawn-time bound on the speed bias, in steps of SPEED_STEP_US.
pub const MAX_SPEED_STEPS: i32 = 5;
/// Ticks a snake stays frozen after the rival picks up a Freeze item.
pub const FREEZE_TICKS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    /// Sentinel for "not on the board". `Arena::set_cell` ignores it.
    pub const OFF_GRID: Coord = Coord { row: -1, col: -1 };

    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The coordinate one step away in `dir`. Pure arithmetic, no bounds
    /// check; callers validate through collision resolution before
    /// committing anything.
    pub fn step(self, dir: Direction) -> Coord {
        match dir {
            Direction::Up => Coord::new(self.row - 1, self.col),
            Direction::Down => Coord::new(self.row + 1, self.col),
            Direction::Left => Coord::new(self.row, self.col - 1),
            Direction::Right => Coord::new(self.row, self.col + 1),
        }
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        let dr = (self.row - other.row).abs();
        let dc = (self.col - other.col).abs();
        dr + dc == 1
    }

    /// Euclidean distance, used by the pursuit/evasion heuristics.
    pub fn dist(self, other: Coord) -> f32 {
        let dr = (self.row - other.row) as f32;
        let dc = (self.col - other.col) as f32;
        (dr * dr + dc * dc).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Enum order, also the wire encoding order (0..=3).
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn turn_left(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Down => Direction::Right,
            Direction::Left => Direction::Down,
            Direction::Right => Direction::Up,
        }
    }

    pub fn turn_right(self) -> Direction {
        self.turn_left().opposite()
    }

    /// Wire encoding: Up=0, Down=1, Left=2, Right=3.
    pub fn index(self) -> i32 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn from_index(i: i32) -> Option<Direction> {
        match i {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    SnakeA,
    SnakeB,
    Food,
    PopWall,
    HighSpeed,
    LowSpeed,
    Freeze,
}

impl Cell {
    /// Stable wire code, used by item broadcasts.
    pub fn code(self) -> i32 {
        match self {
            Cell::Empty => 0,
            Cell::Wall => 1,
            Cell::SnakeA => 2,
            Cell::SnakeB => 3,
            Cell::Food => 4,
            Cell::PopWall => 5,
            Cell::HighSpeed => 6,
            Cell::LowSpeed => 7,
            Cell::Freeze => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            2 => Some(Cell::SnakeA),
            3 => Some(Cell::SnakeB),
            4 => Some(Cell::Food),
            5 => Some(Cell::PopWall),
            6 => Some(Cell::HighSpeed),
            7 => Some(Cell::LowSpeed),
            8 => Some(Cell::Freeze),
            _ => None,
        }
    }

    pub fn is_body(self) -> bool {
        matches!(self, Cell::SnakeA | Cell::SnakeB)
    }
}

/// Which of the two body cell kinds a snake writes into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeKind {
    A,
    B,
}

impl SnakeKind {
    pub fn cell(self) -> Cell {
        match self {
            SnakeKind::A => Cell::SnakeA,
            SnakeKind::B => Cell::SnakeB,
        }
    }

    pub fn other(self) -> SnakeKind {
        match self {
            SnakeKind::A => SnakeKind::B,
            SnakeKind::B => SnakeKind::A,
        }
    }

    fn freeze_slot(self) -> usize {
        match self {
            SnakeKind::A => 0,
            SnakeKind::B => 1,
        }
    }
}

/// The bounded play surface. One contiguous buffer indexed row*width+col.
///
/// The wall ring sits one cell in from each edge (row/col 1 and
/// height-1/width-1); row 0 and col 0 exist but legal play never reaches
/// them without hitting the wall first.
#[derive(Debug, Clone)]
pub struct Arena {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
    speed_us: i32,
    freeze: [i32; 2],
}

impl Arena {
    pub fn new(width: i32, height: i32) -> Self {
        let mut arena = Self {
            cells: vec![Cell::Empty; (width * height) as usize],
            width,
            height,
            speed_us: 0,
            freeze: [0, 0],
        };
        for row in 0..height {
            for col in 0..width {
                if row == 1 || row == height - 1 || col == 1 || col == width - 1 {
                    arena.cells[(row * width + col) as usize] = Cell::Wall;
                }
            }
        }
        arena
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn in_bounds(&self, c: Coord) -> bool {
        c.row >= 0 && c.row < self.height && c.col >= 0 && c.col < self.width
    }

    /// Out-of-range reads answer Wall; anything beyond the edge kills you
    /// just the same and it keeps the probe code free of bounds juggling.
    pub fn cell_at(&self, c: Coord) -> Cell {
        if self.in_bounds(c) {
            self.cells[(c.row * self.width + c.col) as usize]
        } else {
            Cell::Wall
        }
    }

    /// No-op for OFF_GRID and anything else out of range.
    pub fn set_cell(&mut self, c: Coord, cell: Cell) {
        if self.in_bounds(c) {
            self.cells[(c.row * self.width + c.col) as usize] = cell;
        }
    }

    pub fn speed_us(&self) -> i32 {
        self.speed_us
    }

    pub fn add_speed(&mut self, delta_us: i32) {
        self.speed_us += delta_us;
    }

    pub fn freeze_left(&self, kind: SnakeKind) -> i32 {
        self.freeze[kind.freeze_slot()]
    }

    pub fn set_freeze(&mut self, kind: SnakeKind, ticks: i32) {
        self.freeze[kind.freeze_slot()] = ticks;
    }

    pub fn tick_freeze(&mut self, kind: SnakeKind) {
        let slot = kind.freeze_slot();
        if self.freeze[slot] > 0 {
            self.freeze[slot] -= 1;
        }
    }

    pub fn count_cells(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}
