pub mod defensive;
pub mod heatmap;
pub mod pursuit;
pub mod random;
pub mod spread;

use std::collections::HashMap;
use std::fmt;

use rand::RngCore;

use crate::arena::{Arena, Cell, Direction};
use crate::snake::Snake;

/// A movement heuristic. Strategies are pure functions of the current
/// board state; nothing persists between ticks.
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Pick the direction to move this tick. `rival` is the opposing
    /// snake's state when one exists; strategies that track the rival fall
    /// back to their positional logic without one.
    fn decide(
        &self,
        me: &Snake,
        rival: Option<&Snake>,
        arena: &Arena,
        rng: &mut dyn RngCore,
    ) -> Direction;

    fn name(&self) -> &str;
    fn clone_box(&self) -> Box<dyn Strategy>;
}

/// Whether the cell one step in `dir` holds anything other than a wall or
/// a snake body. A safe first step can still be a terrible idea.
pub fn is_safe(me: &Snake, dir: Direction, arena: &Arena) -> bool {
    !matches!(
        arena.cell_at(me.head().step(dir)),
        Cell::Wall | Cell::SnakeA | Cell::SnakeB
    )
}

type Factory = Box<dyn Fn() -> Box<dyn Strategy> + Send + Sync>;

pub struct StrategyRegistry {
    strategies: HashMap<String, Factory>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: HashMap::new(),
        };
        registry.register_builtin();
        registry
    }

    fn register_builtin(&mut self) {
        self.register("naive-random", || Box::new(random::NaiveRandom));
        self.register("random", || Box::new(random::NaiveRandom));
        self.register("wall-aware", || Box::new(random::WallAware));
        self.register("wall-random", || Box::new(random::WallAware));
        self.register("spread", || Box::new(spread::Spread));
        self.register("aggro", || Box::new(pursuit::Pursuit));
        self.register("pursuit", || Box::new(pursuit::Pursuit));
        self.register("defensive", || Box::new(defensive::Defensive));
        self.register("heat-map", || Box::new(heatmap::HeatMap));
        self.register("heatmap", || Box::new(heatmap::HeatMap));
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Strategy> + Send + Sync + 'static,
    {
        self.strategies.insert(name.to_lowercase(), Box::new(factory));
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn Strategy>> {
        self.strategies.get(&name.to_lowercase()).map(|f| f())
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn global() -> &'static StrategyRegistry {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<StrategyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(StrategyRegistry::new)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
