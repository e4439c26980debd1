pub mod arena;
pub mod console;
pub mod host;
pub mod input;
pub mod metrics;
pub mod network;
pub mod peer;
pub mod simulation;
pub mod snake;
pub mod strategies;

pub use arena::{Arena, Cell, Coord, Direction};
pub use host::{Host, HostConfig};
pub use simulation::{Game, GameConfig, GameMode};
pub use snake::Snake;
pub use strategies::Strategy;

pub mod prelude {
    pub use crate::arena::{Arena, Cell, Coord, Direction, SnakeKind};
    pub use crate::host::{Host, HostConfig};
    pub use crate::metrics::MatchMetrics;
    pub use crate::network::DirSlot;
    pub use crate::peer::PeerConfig;
    pub use crate::simulation::{Game, GameConfig, GameMode};
    pub use crate::snake::Snake;
    pub use crate::strategies::{Strategy, StrategyRegistry};
}
