// Movement and collision resolution for one snake, one tick.
// Collisions are decided by inspecting the destination cell before any
// board mutation: a snake can never pass through another in the same tick.

use rand::{Rng, RngCore};
use tracing::debug;

use crate::arena::{Arena, Cell, Coord, Direction, FREEZE_TICKS, SPEED_STEP_US};
use crate::console::{Console, glyph_for};
use crate::snake::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Freeze counter was running; nothing moved, the counter ticked down.
    Frozen,
    /// The snake advanced one cell. `ate` reports a consumed item, if any.
    Moved { ate: Option<Cell> },
    /// Fatal collision. The head glyph and grid cell still reflect the
    /// final position; the caller treats the snake as dead.
    Collided,
}

impl Outcome {
    pub fn is_fatal(self) -> bool {
        matches!(self, Outcome::Collided)
    }
}

/// Advances `snake` one step in `want`, resolving whatever sits in the
/// destination cell. The requested direction is committed even when the
/// move turns out fatal.
pub fn advance(
    arena: &mut Arena,
    snake: &mut Snake,
    want: Direction,
    rng: &mut dyn RngCore,
    console: &mut dyn Console,
) -> Outcome {
    if arena.freeze_left(snake.kind()) > 0 {
        arena.tick_freeze(snake.kind());
        return Outcome::Frozen;
    }

    snake.dir = want;
    let new_head = snake.head().step(want);

    let (glyph, color) = glyph_for(snake.kind().cell());
    console.draw(new_head, glyph, color);

    let target = arena.cell_at(new_head);
    let mut ate = None;
    let fatal = match target {
        Cell::Wall | Cell::SnakeA | Cell::SnakeB => true,
        Cell::Food => {
            snake.set_grow_pending(true);
            ate = Some(Cell::Food);
            false
        }
        Cell::PopWall => {
            scatter_walls(arena, rng, console);
            ate = Some(Cell::PopWall);
            false
        }
        Cell::HighSpeed => {
            // bounds are enforced when the item spawns, not here
            arena.add_speed(SPEED_STEP_US);
            ate = Some(Cell::HighSpeed);
            false
        }
        Cell::LowSpeed => {
            arena.add_speed(-SPEED_STEP_US);
            ate = Some(Cell::LowSpeed);
            false
        }
        Cell::Freeze => {
            // freezes the rival, never the collector
            arena.set_freeze(snake.kind().other(), FREEZE_TICKS);
            ate = Some(Cell::Freeze);
            false
        }
        Cell::Empty => false,
    };

    // The head is committed either way so the board shows where the snake
    // ended up.
    snake.push_head(arena, new_head);

    if fatal {
        debug!(kind = ?snake.kind(), at = ?new_head, hit = ?target, "fatal collision");
        return Outcome::Collided;
    }

    if snake.grow_pending() {
        // keep the tail this once: net growth of one segment
        snake.set_grow_pending(false);
        debug!(kind = ?snake.kind(), len = snake.len(), "grew");
    } else {
        let freed = snake.pop_tail(arena);
        console.draw(freed, ' ', None);
    }

    Outcome::Moved { ate }
}

/// Board-wide side effect of a PopWall pickup: a batch of new walls lands
/// on random empty cells. Occupied picks are simply skipped, so the real
/// number placed varies.
fn scatter_walls(arena: &mut Arena, rng: &mut dyn RngCore, console: &mut dyn Console) {
    let divisor = 100 + rng.gen_range(0..50);
    let batch = arena.width() * arena.height() / divisor;
    for _ in 0..batch {
        let pos = Coord::new(
            rng.gen_range(1..arena.height()),
            rng.gen_range(1..arena.width()),
        );
        if arena.cell_at(pos) == Cell::Empty {
            arena.set_cell(pos, Cell::Wall);
            let (glyph, color) = glyph_for(Cell::Wall);
            console.draw(pos, glyph, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{ALL_DIRECTIONS, MAX_SPEED_STEPS};
    use crate::console::NullConsole;
    use crate::snake::Snake;
    use crate::arena::SnakeKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (Arena, Snake, NullConsole, StdRng) {
        let mut arena = Arena::new(20, 20);
        let snake = Snake::at_slot(SnakeKind::A, 0, &mut arena).unwrap();
        (arena, snake, NullConsole::new(20, 20), StdRng::seed_from_u64(7))
    }

    #[test]
    fn plain_move_keeps_length_and_relocates_head() {
        let (mut arena, mut snake, mut con, mut rng) = setup();
        let before = snake.head();
        let out = advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
        assert_eq!(out, Outcome::Moved { ate: None });
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), before.step(Direction::Right));
        assert_eq!(arena.cell_at(snake.head()), Cell::SnakeA);
        assert_eq!(arena.cell_at(before), Cell::Empty);
        assert_eq!(snake.dir, Direction::Right);
    }

    #[test]
    fn food_grows_by_exactly_one_and_keeps_the_tail() {
        let (mut arena, mut snake, mut con, mut rng) = setup();
        let tail_before = snake.tail();
        let target = snake.head().step(Direction::Right);
        arena.set_cell(target, Cell::Food);

        let out = advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
        assert_eq!(out, Outcome::Moved { ate: Some(Cell::Food) });
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), tail_before, "tail stays put on the growth tick");
        assert!(!snake.grow_pending(), "growth flag is consumed the same tick");

        // the following move is a normal one again
        let out = advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
        assert_eq!(out, Outcome::Moved { ate: None });
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn wall_hit_is_fatal_but_records_final_position() {
        let (mut arena, mut snake, mut con, mut rng) = setup();
        let target = snake.head().step(Direction::Up);
        arena.set_cell(target, Cell::Wall);
        let out = advance(&mut arena, &mut snake, Direction::Up, &mut rng, &mut con);
        assert_eq!(out, Outcome::Collided);
        assert_eq!(snake.dir, Direction::Up, "direction commits even on death");
        assert_eq!(arena.cell_at(target), Cell::SnakeA, "head overwrites the grid");
    }

    #[test]
    fn body_hit_is_fatal_for_either_kind() {
        for body in [Cell::SnakeA, Cell::SnakeB] {
            let (mut arena, mut snake, mut con, mut rng) = setup();
            let target = snake.head().step(Direction::Down);
            arena.set_cell(target, body);
            let out = advance(&mut arena, &mut snake, Direction::Down, &mut rng, &mut con);
            assert_eq!(out, Outcome::Collided);
        }
    }

    #[test]
    fn freeze_pickup_freezes_the_rival_then_rival_skips_ticks() {
        let (mut arena, mut snake, mut con, mut rng) = setup();
        let target = snake.head().step(Direction::Right);
        arena.set_cell(target, Cell::Freeze);
        advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
        assert_eq!(arena.freeze_left(SnakeKind::B), FREEZE_TICKS);
        assert_eq!(arena.freeze_left(SnakeKind::A), 0, "collector is never frozen");

        let mut rival = Snake::at_slot(SnakeKind::B, 1, &mut arena).unwrap();
        let head_before = rival.head();
        let out = advance(&mut arena, &mut rival, Direction::Left, &mut rng, &mut con);
        assert_eq!(out, Outcome::Frozen);
        assert_eq!(rival.head(), head_before);
        assert_eq!(arena.freeze_left(SnakeKind::B), FREEZE_TICKS - 1);
    }

    #[test]
    fn speed_items_shift_the_global_bias() {
        let (mut arena, mut snake, mut con, mut rng) = setup();
        arena.set_cell(snake.head().step(Direction::Right), Cell::HighSpeed);
        advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
        assert_eq!(arena.speed_us(), SPEED_STEP_US);

        arena.set_cell(snake.head().step(Direction::Right), Cell::LowSpeed);
        advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
        assert_eq!(arena.speed_us(), 0);
    }

    #[test]
    fn collection_ignores_the_spawn_bound() {
        // the ±5 step clamp applies at spawn time only
        let (mut arena, mut snake, mut con, mut rng) = setup();
        arena.add_speed(MAX_SPEED_STEPS * SPEED_STEP_US);
        arena.set_cell(snake.head().step(Direction::Right), Cell::HighSpeed);
        advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
        assert_eq!(arena.speed_us(), (MAX_SPEED_STEPS + 1) * SPEED_STEP_US);
    }

    #[test]
    fn popwall_scatters_walls_on_empty_cells_only() {
        // any single batch may land every pick on an occupied cell, so run
        // a handful of seeds and require that walls appeared somewhere
        let mut grew = false;
        for seed in 0..10 {
            let mut arena = Arena::new(20, 20);
            let mut snake = Snake::at_slot(SnakeKind::A, 0, &mut arena).unwrap();
            let mut con = NullConsole::new(20, 20);
            let mut rng = StdRng::seed_from_u64(seed);
            let walls_before = arena.count_cells(Cell::Wall);
            arena.set_cell(snake.head().step(Direction::Right), Cell::PopWall);
            let out = advance(&mut arena, &mut snake, Direction::Right, &mut rng, &mut con);
            assert_eq!(out, Outcome::Moved { ate: Some(Cell::PopWall) });
            grew |= arena.count_cells(Cell::Wall) > walls_before;
            // the snake itself is never overwritten
            assert_eq!(arena.cell_at(snake.head()), Cell::SnakeA);
        }
        assert!(grew, "ten batches on a mostly empty board must place a wall");
    }

    proptest! {
        // Non-fatal moves grow the body iff the destination held food, and
        // the head cell always carries the snake's kind afterwards.
        #[test]
        fn growth_iff_food(seed in 0u64..500, dir_ix in 0usize..4, food in proptest::bool::ANY) {
            let mut arena = Arena::new(20, 20);
            let mut snake = Snake::at_slot(SnakeKind::A, 0, &mut arena).unwrap();
            let mut con = NullConsole::new(20, 20);
            let mut rng = StdRng::seed_from_u64(seed);
            let dir = ALL_DIRECTIONS[dir_ix];
            let len_before = snake.len();
            if food {
                arena.set_cell(snake.head().step(dir), Cell::Food);
            }
            let out = advance(&mut arena, &mut snake, dir, &mut rng, &mut con);
            if let Outcome::Moved { ate } = out {
                prop_assert_eq!(arena.cell_at(snake.head()), Cell::SnakeA);
                if ate == Some(Cell::Food) {
                    prop_assert_eq!(snake.len(), len_before + 1);
                } else {
                    prop_assert_eq!(snake.len(), len_before);
                }
            }
        }
    }
}
