use rand::RngCore;

use super::{Strategy, is_safe, spread::Spread};
use crate::arena::{ALL_DIRECTIONS, Arena, Cell, Coord, Direction, SnakeKind};
use crate::snake::Snake;

/// Box-blur passes over the field before the neighbor comparison.
const DIFFUSION_ITERATIONS: usize = 5;

/// Per-cell seed weight, from the deciding snake's point of view.
fn weight(cell: Cell, me: SnakeKind) -> f32 {
    match cell {
        Cell::Wall => -3.0,
        c if c == me.cell() => -5.0,
        c if c.is_body() => -3.0, // the rival's body
        Cell::Food => 2.0,
        Cell::PopWall => 3.0,
        Cell::HighSpeed => 4.0,
        Cell::LowSpeed => -1.0,
        Cell::Freeze => 1.0,
        _ => 0.0,
    }
}

/// Seeds weights and runs the fixed diffusion. Only interior EMPTY cells
/// ever change; walls, bodies and items keep their seed weight so the
/// field stays anchored to what is actually on the board.
pub(crate) fn diffuse(arena: &Arena, me: SnakeKind) -> Vec<f32> {
    let (w, h) = (arena.width() as usize, arena.height() as usize);
    let mut heat: Vec<f32> = (0..w * h)
        .map(|i| {
            let c = Coord::new((i / w) as i32, (i % w) as i32);
            weight(arena.cell_at(c), me)
        })
        .collect();
    let mut next = heat.clone();

    for _ in 0..DIFFUSION_ITERATIONS {
        for row in 1..h - 1 {
            for col in 1..w - 1 {
                if arena.cell_at(Coord::new(row as i32, col as i32)) != Cell::Empty {
                    continue;
                }
                let mut sum = 0.0;
                for dr in 0..3 {
                    for dc in 0..3 {
                        sum += heat[(row + dr - 1) * w + (col + dc - 1)];
                    }
                }
                next[row * w + col] = sum / 9.0;
            }
        }
        heat.copy_from_slice(&next);
    }
    heat
}

/// Potential-field heuristic: diffuse item attraction and obstacle
/// repulsion across the board, then step toward the strictly hottest of
/// the four neighbor cells, provided that step is safe. Anything short of
/// a strict winner goes to spread.
#[derive(Debug, Clone)]
pub struct HeatMap;

impl Strategy for HeatMap {
    fn decide(
        &self,
        me: &Snake,
        rival: Option<&Snake>,
        arena: &Arena,
        rng: &mut dyn RngCore,
    ) -> Direction {
        let heat = diffuse(arena, me.kind());
        let w = arena.width() as usize;
        let head = me.head();
        let value = |d: Direction| {
            let c = head.step(d);
            heat[c.row as usize * w + c.col as usize]
        };

        for dir in ALL_DIRECTIONS {
            let v = value(dir);
            let strictly_hottest = ALL_DIRECTIONS
                .into_iter()
                .filter(|&other| other != dir)
                .all(|other| v > value(other));
            if strictly_hottest && is_safe(me, dir, arena) {
                return dir;
            }
        }
        Spread.decide(me, rival, arena, rng)
    }

    fn name(&self) -> &str {
        "heat-map"
    }

    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}
