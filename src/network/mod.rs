pub mod wire;

use crate::arena::Direction;

/// Reserved direction-vector value marking a dead agent. Outside the
/// 0..=3 direction range on purpose; once the host assigns it, no peer
/// input ever overwrites it.
pub const DEAD_SENTINEL: i32 = 4;

/// Item-record kind value meaning "nothing spawned this tick".
pub const NO_ITEM: i32 = -1;

/// Start-of-game signal payload.
pub const GO_SIGNAL: i32 = 1;

/// One slot of the shared per-agent direction array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSlot {
    Moving(Direction),
    Dead,
}

impl DirSlot {
    pub fn encode(self) -> i32 {
        match self {
            DirSlot::Moving(d) => d.index(),
            DirSlot::Dead => DEAD_SENTINEL,
        }
    }

    /// Decodes a wire value. Out-of-range values answer `None`; the host
    /// treats those as a protocol violation to ignore, not an error.
    pub fn decode(v: i32) -> Option<DirSlot> {
        if v == DEAD_SENTINEL {
            Some(DirSlot::Dead)
        } else {
            Direction::from_index(v).map(DirSlot::Moving)
        }
    }

    pub fn is_dead(self) -> bool {
        matches!(self, DirSlot::Dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ALL_DIRECTIONS;

    #[test]
    fn slots_round_trip_and_reject_garbage() {
        for d in ALL_DIRECTIONS {
            let slot = DirSlot::Moving(d);
            assert_eq!(DirSlot::decode(slot.encode()), Some(slot));
        }
        assert_eq!(DirSlot::decode(DEAD_SENTINEL), Some(DirSlot::Dead));
        assert_eq!(DirSlot::decode(5), None);
        assert_eq!(DirSlot::decode(-1), None);
    }
}
