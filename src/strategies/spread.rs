use rand::RngCore;

use super::{Strategy, is_safe, random::WallAware};
use crate::arena::{ALL_DIRECTIONS, Arena, Cell, Coord, Direction};
use crate::snake::Snake;

/// Flood-fill visit cap. The count is a bounded estimate, not a full
/// connected-component size.
pub const FLOOD_CAP: usize = 21;

/// Bounded worklist flood-fill: how many empty cells are reachable from
/// `from`, counting at most FLOOD_CAP of them. Non-empty start counts zero.
pub(crate) fn reachable_area(arena: &Arena, from: Coord) -> usize {
    let mut visited: Vec<Coord> = Vec::with_capacity(FLOOD_CAP);
    let mut stack = vec![from];
    while let Some(c) = stack.pop() {
        if visited.len() >= FLOOD_CAP {
            break;
        }
        if arena.cell_at(c) != Cell::Empty || visited.contains(&c) {
            continue;
        }
        visited.push(c);
        for dir in ALL_DIRECTIONS {
            stack.push(c.step(dir));
        }
    }
    visited.len()
}

/// Space-maximizing choice: flood-fill one step out in each direction and
/// go where the bounded reachable area is strictly largest among safe
/// directions. Any tie falls back to the wall-aware random pick. Every
/// other strategy delegates here when its own logic cannot decide.
#[derive(Debug, Clone)]
pub struct Spread;

impl Strategy for Spread {
    fn decide(
        &self,
        me: &Snake,
        rival: Option<&Snake>,
        arena: &Arena,
        rng: &mut dyn RngCore,
    ) -> Direction {
        let head = me.head();
        let candidates: Vec<(Direction, usize)> = ALL_DIRECTIONS
            .into_iter()
            .filter(|&d| is_safe(me, d, arena))
            .map(|d| (d, reachable_area(arena, head.step(d))))
            .collect();

        let Some(&(_, best)) = candidates.iter().max_by_key(|(_, area)| *area) else {
            // nowhere safe at all
            return WallAware.decide(me, rival, arena, rng);
        };

        let mut at_best = candidates.iter().filter(|&&(_, area)| area == best);
        match (at_best.next(), at_best.next()) {
            (Some(&(dir, _)), None) => dir,
            // two or more directions look equally roomy: let chance break it
            _ => WallAware.decide(me, rival, arena, rng),
        }
    }

    fn name(&self) -> &str {
        "spread"
    }

    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::SnakeKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    // Walls off everything except the listed cells, head placed at `head`.
    fn walled_arena(head: Coord, open: &[Coord]) -> (Arena, Snake) {
        let mut arena = Arena::new(24, 24);
        for row in 0..24 {
            for col in 0..24 {
                arena.set_cell(Coord::new(row, col), Cell::Wall);
            }
        }
        for &c in open {
            arena.set_cell(c, Cell::Empty);
        }
        arena.set_cell(head, Cell::Empty);
        let mut snake = Snake::at_slot(SnakeKind::A, 0, &mut arena).unwrap();
        // relocate to the crafted head position
        let old = snake.pop_tail(&mut arena);
        arena.set_cell(old, Cell::Wall);
        snake.push_head(&mut arena, head);
        (arena, snake)
    }

    #[test]
    fn flood_fill_counts_are_bounded() {
        let arena = Arena::new(24, 24);
        // the open interior is far bigger than the cap
        assert_eq!(reachable_area(&arena, Coord::new(10, 10)), FLOOD_CAP);
        // a non-empty start counts zero
        assert_eq!(reachable_area(&arena, Coord::new(1, 1)), 0);
    }

    #[test]
    fn flood_fill_respects_walls() {
        // a 1x3 corridor: exactly 3 reachable cells
        let head = Coord::new(10, 10);
        let corridor = [Coord::new(10, 11), Coord::new(10, 12), Coord::new(10, 13)];
        let (arena, _) = walled_arena(head, &corridor);
        assert_eq!(reachable_area(&arena, corridor[0]), 3);
    }

    #[test]
    fn spread_picks_the_strictly_largest_safe_room() {
        // right: a 3-cell corridor; down: a single pocket; others walled
        let head = Coord::new(10, 10);
        let open = [
            Coord::new(10, 11),
            Coord::new(10, 12),
            Coord::new(10, 13),
            Coord::new(11, 10),
        ];
        let (arena, snake) = walled_arena(head, &open);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(
                Spread.decide(&snake, None, &arena, &mut rng),
                Direction::Right,
                "strictly larger reachable area must win"
            );
        }
    }

    #[test]
    fn spread_tie_falls_back_to_a_safe_random_pick() {
        // two equal 2-cell pockets right and down
        let head = Coord::new(10, 10);
        let open = [
            Coord::new(10, 11),
            Coord::new(10, 12),
            Coord::new(11, 10),
            Coord::new(12, 10),
        ];
        let (arena, snake) = walled_arena(head, &open);
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..40 {
            let dir = Spread.decide(&snake, None, &arena, &mut rng);
            // the fallback is wall-aware, so with safe options available it
            // must return one of them
            assert!(
                dir == Direction::Right || dir == Direction::Down,
                "tie fallback picked unsafe {dir:?}"
            );
        }
    }
}
