use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Who drives the two snakes in a local match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameMode {
    /// Keyboard (wasd) against one AI strategy.
    HumanVsAi { strategy: String },
    /// Two keyboards on one terminal: wasd and ikjl.
    HumanVsHuman,
    /// Two strategies play each other, nobody touches the keys.
    AiVsAi { left: String, right: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub mode: GameMode,
    pub width: i32,
    pub height: i32,
    pub timestep: Duration,
    /// Stop after this many ticks even if everyone is alive. `None` plays
    /// until somebody dies.
    pub max_ticks: Option<u64>,
    /// Per-tick probability of rolling an item.
    pub item_odds: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "local_match".to_string(),
            mode: GameMode::HumanVsAi {
                strategy: "heat-map".to_string(),
            },
            width: 60,
            height: 25,
            timestep: Duration::from_millis(150),
            max_ticks: None,
            item_odds: 0.10,
        }
    }
}

impl GameConfig {
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timestep(mut self, timestep: Duration) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_board(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}
