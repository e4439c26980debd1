use rand::{Rng, RngCore};

use super::{Strategy, is_safe};
use crate::arena::{Arena, Direction};
use crate::snake::Snake;

/// Bound on resampling before a strategy gives up and returns whatever it
/// drew last, unsafe or not.
pub const MAX_PICKS: u32 = 20;

fn random_direction(rng: &mut dyn RngCore) -> Direction {
    // from_index never fails on 0..4
    Direction::from_index(rng.gen_range(0..4)).expect("range is 0..4")
}

/// Uniform pick, resampled only until it isn't the exact reverse of the
/// current heading. No obstacle awareness at all; happily walks into walls.
#[derive(Debug, Clone)]
pub struct NaiveRandom;

impl Strategy for NaiveRandom {
    fn decide(
        &self,
        me: &Snake,
        _rival: Option<&Snake>,
        _arena: &Arena,
        rng: &mut dyn RngCore,
    ) -> Direction {
        loop {
            let dir = random_direction(rng);
            if dir != me.dir.opposite() {
                return dir;
            }
        }
    }

    fn name(&self) -> &str {
        "naive-random"
    }

    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

/// Uniform pick resampled until it is neither a reversal nor an unsafe
/// step, up to MAX_PICKS attempts. When the budget runs out the last
/// sample is returned as-is; picking your own death is an accepted risk
/// here, not an error.
#[derive(Debug, Clone)]
pub struct WallAware;

impl Strategy for WallAware {
    fn decide(
        &self,
        me: &Snake,
        _rival: Option<&Snake>,
        arena: &Arena,
        rng: &mut dyn RngCore,
    ) -> Direction {
        let mut dir = random_direction(rng);
        let mut picks = 1;
        while (dir == me.dir.opposite() || !is_safe(me, dir, arena)) && picks < MAX_PICKS {
            dir = random_direction(rng);
            picks += 1;
        }
        dir
    }

    fn name(&self) -> &str {
        "wall-aware"
    }

    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}
