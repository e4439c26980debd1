use rand::RngCore;

use super::{Strategy, is_safe, spread::Spread};
use crate::arena::{Arena, Direction};
use crate::snake::Snake;

/// Below this head-to-head distance the chase is called off and the spread
/// heuristic takes over; closing further is considered too risky.
pub const ENGAGE_DISTANCE: f32 = 6.0;

/// Tie-break priority shared by pursuit and evasion.
pub(crate) const PRIORITY: [Direction; 4] = [
    Direction::Left,
    Direction::Down,
    Direction::Up,
    Direction::Right,
];

/// Closes in on the rival's head: among safe directions, the one whose
/// resulting position is nearest to the rival, ties broken Left, Down, Up,
/// Right. No rival, no safe direction, or already close -> spread.
#[derive(Debug, Clone)]
pub struct Pursuit;

impl Strategy for Pursuit {
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
        let target = rival_snake.head();
        let head = me.head();

        if head.dist(target) < ENGAGE_DISTANCE {
            return Spread.decide(me, rival, arena, rng);
        }

        let mut best: Option<(Direction, f32)> = None;
        for dir in PRIORITY {
            if !is_safe(me, dir, arena) {
                continue;
            }
            let d = head.step(dir).dist(target);
            // strict comparison keeps the earlier priority entry on ties
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((dir, d));
            }
        }
        match best {
            Some((dir, _)) => dir,
            None => Spread.decide(me, rival, arena, rng),
        }
    }

    fn name(&self) -> &str {
        "aggro"
    }

    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}
