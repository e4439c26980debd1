use rand::RngCore;

use super::pursuit::PRIORITY;
use super::{Strategy, is_safe, spread::Spread};
use crate::arena::{Arena, Direction};
use crate::snake::Snake;

/// Mirror of the pursuit heuristic: runs from the rival's head instead of
/// chasing it. Once the gap exceeds half the grid height the flight is
/// over and spread takes back control.
#[derive(Debug, Clone)]
pub struct Defensive;

impl Strategy for Defensive {
    fn decide(
        &self,
        me: &Snake,
        rival: Option<&Snake>,
        arena: &Arena,
        rng: &mut dyn RngCore,
    ) -> Direction {
        let Some(rival_snake) = rival else {
            return Spread.decide(me, rival, arena, rng);
        };
        let threat = rival_snake.head();
        let head = me.head();

        if head.dist(threat) > arena.height() as f32 / 2.0 {
            // far enough; no need to keep running
            return Spread.decide(me, rival, arena, rng);
        }

        let mut best: Option<(Direction, f32)> = None;
        for dir in PRIORITY {
            if !is_safe(me, dir, arena) {
                continue;
            }
            let d = head.step(dir).dist(threat);
            if best.is_none_or(|(_, bd)| d > bd) {
                best = Some((dir, d));
            }
        }
        match best {
            Some((dir, _)) => dir,
            None => Spread.decide(me, rival, arena, rng),
        }
    }

    fn name(&self) -> &str {
        "defensive"
    }

    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Cell, Coord, SnakeKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn snake_at(arena: &mut Arena, kind: SnakeKind, slot: usize, head: Coord) -> Snake {
        let mut s = Snake::at_slot(kind, slot, arena).unwrap();
        let old = s.pop_tail(arena);
        arena.set_cell(old, Cell::Empty);
        s.push_head(arena, head);
        s
    }

    #[test]
    fn nearby_rival_triggers_flight() {
        let mut arena = Arena::new(30, 30);
        let me = snake_at(&mut arena, SnakeKind::A, 0, Coord::new(10, 10));
        let rival = snake_at(&mut arena, SnakeKind::B, 1, Coord::new(10, 14));
        // distance 4 < 15; running Left opens the gap the most
        let mut rng = StdRng::seed_from_u64(20);
        assert_eq!(
            Defensive.decide(&me, Some(&rival), &arena, &mut rng),
            Direction::Left
        );
    }

    #[test]
    fn distant_rival_means_spread_rules() {
        let mut arena = Arena::new(30, 30);
        let me = snake_at(&mut arena, SnakeKind::A, 0, Coord::new(5, 5));
        let rival = snake_at(&mut arena, SnakeKind::B, 1, Coord::new(27, 27));
        // distance ~31 > 15: delegate to spread; force spread's hand with a
        // single safe direction
        for dir in [Direction::Up, Direction::Left, Direction::Right] {
            arena.set_cell(Coord::new(5, 5).step(dir), Cell::Wall);
        }
        let mut rng = StdRng::seed_from_u64(21);
        assert_eq!(
            Defensive.decide(&me, Some(&rival), &arena, &mut rng),
            Direction::Down
        );
    }

    #[test]
    fn flight_only_considers_safe_directions() {
        let mut arena = Arena::new(30, 30);
        let me = snake_at(&mut arena, SnakeKind::A, 0, Coord::new(10, 10));
        let rival = snake_at(&mut arena, SnakeKind::B, 1, Coord::new(10, 13));
        // the best escape (Left) is walled; next best must be taken
        arena.set_cell(Coord::new(10, 9), Cell::Wall);
        let mut rng = StdRng::seed_from_u64(22);
        let dir = Defensive.decide(&me, Some(&rival), &arena, &mut rng);
        assert!(
            dir == Direction::Up || dir == Direction::Down,
            "vertical moves are the farthest remaining options, got {dir:?}"
        );
        // ties between Up and Down resolve to Down (earlier in priority)
        assert_eq!(dir, Direction::Down);
    }
}
