pub mod config;
pub mod engine;
pub mod items;

pub use config::{GameConfig, GameMode};

use anyhow::{Result, anyhow};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::console::{AnsiConsole, Console, NullConsole, draw_arena};
use crate::input::{
    InputQueue, MAX_INPUT_STACK, is_quit_key, p1_key_to_dir, p2_key_to_dir, resolve_direction,
};
use crate::metrics::{MatchMetrics, save_results};
use crate::snake::Snake;
use crate::strategies::{Strategy, StrategyRegistry};

/// What drives one of the two local snakes.
enum Controller {
    Human(InputQueue),
    Ai(Box<dyn Strategy>),
}

impl Controller {
    fn human() -> Self {
        Controller::Human(InputQueue::new(MAX_INPUT_STACK))
    }

    fn ai(name: &str) -> Result<Self> {
        let strategy = StrategyRegistry::global()
            .create(name)
            .ok_or_else(|| anyhow!("Unknown strategy: {name}"))?;
        Ok(Controller::Ai(strategy))
    }

    fn push_key(&mut self, dir: crate::arena::Direction) {
        if let Controller::Human(queue) = self {
            // silently dropped once the stack is full
            queue.push(dir);
        }
    }
}

/// A complete local match: two snakes, one board, one terminal.
pub struct Game {
    config: GameConfig,
    pub metrics: MatchMetrics,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            metrics: MatchMetrics::new(),
        }
    }

    /// Interactive entry point: renders to the terminal and reads control
    /// bytes from stdin. The caller is expected to have put the terminal
    /// into raw mode already.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        let (key_tx, key_rx) = mpsc::unbounded_channel();
        let stdin_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut stdin = tokio::io::stdin();
            loop {
                tokio::select! {
                    byte = stdin.read_u8() => {
                        match byte {
                            Ok(b) => {
                                if key_tx.send(b).is_err() {
                                    break;
                                }
                            }
                            Err(_) => break,
                        }
                    }
                    _ = stdin_cancel.cancelled() => break,
                }
            }
        });

        let mut console = AnsiConsole::new(self.config.width, self.config.height);
        self.run_with_console(&mut console, Some(key_rx), cancel).await
    }

    /// Headless entry point, used by AI-vs-AI runs that nobody watches and
    /// by tests.
    pub async fn run_headless(&mut self, cancel: CancellationToken) -> Result<()> {
        let mut console = NullConsole::new(self.config.width, self.config.height);
        self.run_with_console(&mut console, None, cancel).await
    }

    async fn run_with_console(
        &mut self,
        console: &mut dyn Console,
        mut keys: Option<mpsc::UnboundedReceiver<u8>>,
        cancel: CancellationToken,
    ) -> Result<()> {
        info!("Starting match: {}", self.config.name);
        info!("Mode: {:?}", self.config.mode);
        info!(
            "Board: {}x{}, timestep: {:?}",
            self.config.width, self.config.height, self.config.timestep
        );

        let mut arena = Arena::new(self.config.width, self.config.height);
        let mut snakes = [
            Snake::at_slot(crate::arena::SnakeKind::A, 0, &mut arena)?,
            Snake::at_slot(crate::arena::SnakeKind::B, 1, &mut arena)?,
        ];
        let mut controllers = match &self.config.mode {
            GameMode::HumanVsAi { strategy } => [Controller::human(), Controller::ai(strategy)?],
            GameMode::HumanVsHuman => [Controller::human(), Controller::human()],
            GameMode::AiVsAi { left, right } => [Controller::ai(left)?, Controller::ai(right)?],
        };

        draw_arena(&arena, console);
        let mut rng = StdRng::from_entropy();
        let mut dead = [false, false];
        let mut quit = false;

        loop {
            if cancel.is_cancelled() {
                quit = true;
                break;
            }

            // drain whatever the players typed since the last tick
            if let Some(rx) = keys.as_mut() {
                while let Ok(byte) = rx.try_recv() {
                    if is_quit_key(byte) {
                        quit = true;
                    }
                    if let Some(dir) = p1_key_to_dir(byte) {
                        controllers[0].push_key(dir);
                    }
                    if let Some(dir) = p2_key_to_dir(byte) {
                        controllers[1].push_key(dir);
                    }
                }
            }
            if quit {
                break;
            }

            for i in 0..2 {
                if dead[i] {
                    continue;
                }
                let (me, rival) = if i == 0 {
                    (&snakes[0], &snakes[1])
                } else {
                    (&snakes[1], &snakes[0])
                };
                let want = match &mut controllers[i] {
                    Controller::Human(queue) => resolve_direction(queue, me.dir),
                    Controller::Ai(strategy) => strategy.decide(me, Some(rival), &arena, &mut rng),
                };
                let outcome = engine::advance(&mut arena, &mut snakes[i], want, &mut rng, console);
                if outcome.is_fatal() {
                    dead[i] = true;
                    self.metrics.death();
                    debug!(agent = i, "snake died");
                }
            }

            if rng.gen_bool(self.config.item_odds)
                && items::spawn(&mut arena, true, &mut rng, console).is_some()
            {
                self.metrics.item_spawned();
            }

            self.metrics.tick();
            let alive = dead.iter().filter(|&&d| !d).count();
            let longest = snakes.iter().map(Snake::len).max().unwrap_or(0);
            self.metrics.save_snapshot(alive, longest);
            console.flush();

            if dead[0] || dead[1] {
                break;
            }
            if let Some(max) = self.config.max_ticks
                && self.metrics.ticks() >= max
            {
                break;
            }

            // speed items shave microseconds off the pause, low-speed items
            // put them back
            let sleep_us = (self.config.timestep.as_micros() as i64 - arena.speed_us() as i64).max(0);
            tokio::select! {
                _ = tokio::time::sleep(std::time::Duration::from_micros(sleep_us as u64)) => {}
                _ = cancel.cancelled() => {
                    quit = true;
                    break;
                }
            }
        }

        let winner = match (quit, dead) {
            (true, _) => None,
            (_, [true, false]) => Some(1),
            (_, [false, true]) => Some(0),
            _ => None,
        };
        match winner {
            Some(i) => info!("Match over after {} ticks, snake {} wins", self.metrics.ticks(), i),
            None => info!("Match over after {} ticks, no winner", self.metrics.ticks()),
        }
        save_results(&self.metrics, &self.config.name, winner)?;
        Ok(())
    }
}
