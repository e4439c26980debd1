// Item spawner: a weighted draw dropped onto a random empty interior cell.
// Food is four times as likely as any other category; the speed items are
// vetoed once the global bias has hit its bound.

use rand::{Rng, RngCore};
use tracing::debug;

use crate::arena::{Arena, Cell, Coord, MAX_SPEED_STEPS, SPEED_STEP_US};
use crate::console::{Console, glyph_for};

/// Picks the item category. `None` means the draw was vetoed.
/// Rolls: 0 = Freeze, 1 = HighSpeed, 2 = LowSpeed, 3 = PopWall, 4..=7 = Food;
/// the freeze roll only exists when the category is enabled.
fn categorize(roll: i32, speed_us: i32) -> Option<Cell> {
    match roll {
        0 => Some(Cell::Freeze),
        1 => {
            if speed_us >= MAX_SPEED_STEPS * SPEED_STEP_US {
                None
            } else {
                Some(Cell::HighSpeed)
            }
        }
        2 => {
            if speed_us <= -MAX_SPEED_STEPS * SPEED_STEP_US {
                None
            } else {
                Some(Cell::LowSpeed)
            }
        }
        3 => Some(Cell::PopWall),
        _ => Some(Cell::Food),
    }
}

/// Spawns one item on a random empty cell and reports what landed where.
/// `None` when the draw was vetoed or no empty cell was found within the
/// retry budget (one pick per board cell; a full board skips the spawn
/// instead of looping forever).
pub fn spawn(
    arena: &mut Arena,
    enable_freeze: bool,
    rng: &mut dyn RngCore,
    console: &mut dyn Console,
) -> Option<(Cell, Coord)> {
    let lo = if enable_freeze { 0 } else { 1 };
    let roll = rng.gen_range(lo..8);
    let item = categorize(roll, arena.speed_us())?;

    let budget = (arena.width() * arena.height()) as usize;
    let mut pos = None;
    for _ in 0..budget {
        let pick = Coord::new(
            rng.gen_range(1..arena.height()),
            rng.gen_range(1..arena.width()),
        );
        if arena.cell_at(pick) == Cell::Empty {
            pos = Some(pick);
            break;
        }
    }
    let pos = pos?;

    arena.set_cell(pos, item);
    let (glyph, color) = glyph_for(item);
    console.draw(pos, glyph, color);
    debug!(?item, at = ?pos, "item spawned");
    Some((item, pos))
}

/// Applies an item broadcast by the host onto the local board.
pub fn place(arena: &mut Arena, item: Cell, at: Coord, console: &mut dyn Console) {
    arena.set_cell(at, item);
    let (glyph, color) = glyph_for(item);
    console.draw(at, glyph, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::NullConsole;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn food_weight_is_four_of_eight() {
        let food = (0..8).filter(|&r| categorize(r, 0) == Some(Cell::Food)).count();
        assert_eq!(food, 4);
        assert_eq!(categorize(0, 0), Some(Cell::Freeze));
        assert_eq!(categorize(1, 0), Some(Cell::HighSpeed));
        assert_eq!(categorize(2, 0), Some(Cell::LowSpeed));
        assert_eq!(categorize(3, 0), Some(Cell::PopWall));
    }

    #[test]
    fn speed_draws_are_vetoed_at_the_bound() {
        let cap = MAX_SPEED_STEPS * SPEED_STEP_US;
        assert_eq!(categorize(1, cap), None);
        assert_eq!(categorize(1, cap - 1), Some(Cell::HighSpeed));
        assert_eq!(categorize(2, -cap), None);
        assert_eq!(categorize(2, -cap + 1), Some(Cell::LowSpeed));
        // the other categories ignore the bias entirely
        assert_eq!(categorize(3, cap), Some(Cell::PopWall));
        assert_eq!(categorize(4, cap), Some(Cell::Food));
    }

    #[test]
    fn vetoed_draw_writes_nothing() {
        let mut arena = Arena::new(12, 12);
        arena.add_speed(MAX_SPEED_STEPS * SPEED_STEP_US);
        let mut con = NullConsole::new(12, 12);
        // hunt for a seed whose first roll is the high-speed category so the
        // veto path is the one exercised
        for seed in 0..200 {
            let mut probe = StdRng::seed_from_u64(seed);
            if probe.gen_range(1..8) == 1 {
                let mut rng = StdRng::seed_from_u64(seed);
                let before = arena.clone();
                let spawned = spawn(&mut arena, false, &mut rng, &mut con);
                assert_eq!(spawned, None, "spawn must report nothing on a veto");
                assert_eq!(arena.count_cells(Cell::HighSpeed), 0);
                assert_eq!(before.count_cells(Cell::Empty), arena.count_cells(Cell::Empty));
                return;
            }
        }
        panic!("no seed rolled the high-speed category");
    }

    #[test]
    fn spawn_lands_on_an_empty_cell_and_reports_it() {
        let mut arena = Arena::new(12, 12);
        let mut con = NullConsole::new(12, 12);
        let mut rng = StdRng::seed_from_u64(42);
        let (item, at) = spawn(&mut arena, true, &mut rng, &mut con).expect("board is empty");
        assert_eq!(arena.cell_at(at), item);
        assert!(at.row >= 1 && at.row < arena.height());
        assert!(at.col >= 1 && at.col < arena.width());
    }

    #[test]
    fn full_board_skips_instead_of_looping() {
        let mut arena = Arena::new(8, 8);
        for row in 0..8 {
            for col in 0..8 {
                arena.set_cell(Coord::new(row, col), Cell::Wall);
            }
        }
        let mut con = NullConsole::new(8, 8);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(spawn(&mut arena, true, &mut rng, &mut con), None);
    }

    #[test]
    fn disabled_freeze_never_rolls_freeze() {
        let mut con = NullConsole::new(16, 16);
        for seed in 0..50 {
            let mut arena = Arena::new(16, 16);
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some((item, _)) = spawn(&mut arena, false, &mut rng, &mut con) {
                assert_ne!(item, Cell::Freeze);
            }
        }
    }
}
