// Authoritative host. Owns the only board state that matters: peers send
// direction requests, the host applies them in lock-step and broadcasts
// the resulting vector. A peer that disagrees is simply wrong.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tokio::io::AsyncBufReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::arena::{Arena, SnakeKind};
use crate::console::NullConsole;
use crate::metrics::{MatchMetrics, save_results};
use crate::network::{DirSlot, wire};
use crate::simulation::{engine, items};
use crate::snake::{START_SLOTS, Snake};

/// Network margin carved out of every tick.
pub const PING: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub addr: String,
    pub width: i32,
    pub height: i32,
    pub timestep: Duration,
    pub min_players: usize,
    pub max_players: usize,
    /// Start as soon as `min_players` are in instead of waiting for the
    /// operator to press enter. Tests rely on this.
    pub auto_start: bool,
    pub max_ticks: Option<u64>,
    pub item_odds: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:7777".to_string(),
            width: 60,
            height: 25,
            timestep: Duration::from_millis(150),
            min_players: 2,
            max_players: START_SLOTS,
            auto_start: false,
            max_ticks: None,
            item_odds: 0.25,
        }
    }
}

pub struct Host {
    config: HostConfig,
    listener: TcpListener,
    pub metrics: MatchMetrics,
}

impl Host {
    pub async fn bind(config: HostConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.addr)
            .await
            .with_context(|| format!("binding {}", config.addr))?;
        Ok(Self {
            config,
            listener,
            metrics: MatchMetrics::new(),
        })
    }

    /// The actual bound address, for `addr` values with port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        let conns = self.lobby(&cancel).await?;
        let count = conns.len();
        info!("Starting match with {} players", count);

        let mut arena = Arena::new(self.config.width, self.config.height);
        let mut snakes = Vec::with_capacity(count);
        for i in 0..count {
            // alternate the two body kinds so adjacent starters differ
            let kind = if i % 2 == 0 { SnakeKind::A } else { SnakeKind::B };
            snakes.push(Snake::at_slot(kind, i, &mut arena)?);
        }
        let dirs: Arc<Mutex<Vec<DirSlot>>> =
            Arc::new(Mutex::new(snakes.iter().map(|s| DirSlot::Moving(s.dir)).collect()));

        // handshake everyone, then split and hand the read halves to their
        // reader tasks
        let mut writers: Vec<Option<OwnedWriteHalf>> = Vec::with_capacity(count);
        for (i, mut stream) in conns.into_iter().enumerate() {
            let hello = wire::Hello {
                snake_size: 1,
                peer_count: count as i32,
                peer_id: i as i32,
                width: self.config.width,
                height: self.config.height,
            };
            hello.write(&mut stream).await?;
            let (reader, writer) = stream.into_split();
            writers.push(Some(writer));
            spawn_reader(i, reader, dirs.clone(), cancel.clone());
        }
        for writer in writers.iter_mut().flatten() {
            wire::write_go(writer).await?;
        }

        let mut rng = StdRng::from_entropy();
        let mut console = NullConsole::new(self.config.width, self.config.height);
        let mut last_tick = Instant::now();
        let target = self.config.timestep.saturating_sub(PING / 2);

        loop {
            // gate on wall clock, sleeping most of the remainder so the
            // final spin is short
            loop {
                let elapsed = last_tick.elapsed();
                if elapsed > target {
                    break;
                }
                let remainder = target - elapsed;
                tokio::select! {
                    _ = tokio::time::sleep(remainder.mul_f32(0.9)) => {}
                    _ = cancel.cancelled() => {}
                }
                if cancel.is_cancelled() {
                    break;
                }
            }
            if cancel.is_cancelled() {
                info!("Host cancelled");
                break;
            }
            last_tick = Instant::now();

            let vector: Vec<i32> = dirs.lock().iter().map(|s| s.encode()).collect();

            // broadcast first so peers replay the exact vector the host is
            // about to apply
            for (i, slot) in writers.iter_mut().enumerate() {
                let Some(writer) = slot else { continue };
                if wire::write_dir_vector(writer, &vector).await.is_err() {
                    warn!("Lost connection to peer {}, marking dead", i);
                    dirs.lock()[i] = DirSlot::Dead;
                    self.metrics.death();
                    *slot = None;
                }
            }

            for i in 0..count {
                let Some(DirSlot::Moving(dir)) = DirSlot::decode(vector[i]) else {
                    continue;
                };
                let outcome =
                    engine::advance(&mut arena, &mut snakes[i], dir, &mut rng, &mut console);
                if outcome.is_fatal() {
                    info!("Peer {} collided on tick {}", i, self.metrics.ticks());
                    dirs.lock()[i] = DirSlot::Dead;
                    self.metrics.death();
                }
            }

            // freeze items stay out of networked play
            let item = if rng.gen_bool(self.config.item_odds) {
                items::spawn(&mut arena, false, &mut rng, &mut console)
            } else {
                None
            };
            if item.is_some() {
                self.metrics.item_spawned();
            }
            for (i, slot) in writers.iter_mut().enumerate() {
                let Some(writer) = slot else { continue };
                if wire::write_item(writer, item).await.is_err() {
                    warn!("Lost connection to peer {}, marking dead", i);
                    dirs.lock()[i] = DirSlot::Dead;
                    self.metrics.death();
                    *slot = None;
                }
            }

            self.metrics.tick();
            let alive = dirs.lock().iter().filter(|s| !s.is_dead()).count();
            let longest = snakes.iter().map(Snake::len).max().unwrap_or(0);
            self.metrics.save_snapshot(alive, longest);

            if alive <= 1 {
                info!("Match over: {} player(s) left", alive);
                break;
            }
            if let Some(max) = self.config.max_ticks
                && self.metrics.ticks() >= max
            {
                info!("Tick cap reached");
                break;
            }
        }

        cancel.cancel();
        let winner = {
            let slots = dirs.lock();
            let alive: Vec<usize> = slots
                .iter()
                .enumerate()
                .filter(|(_, s)| !s.is_dead())
                .map(|(i, _)| i)
                .collect();
            if alive.len() == 1 { Some(alive[0]) } else { None }
        };
        save_results(&self.metrics, "hosted_match", winner)?;
        Ok(())
    }

    /// Accepts connections until the operator starts the match (or until
    /// `min_players` joined, with auto start). Over-capacity connections
    /// are dropped on the floor.
    async fn lobby(&mut self, cancel: &CancellationToken) -> Result<Vec<TcpStream>> {
        info!("Lobby open on {}", self.local_addr()?);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        spinner.set_message("Waiting for players... (enter starts the match)");

        let (start_tx, mut start_rx) = mpsc::channel::<()>(1);
        if !self.config.auto_start {
            tokio::spawn(async move {
                let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
                if lines.next_line().await.is_ok() {
                    let _ = start_tx.send(()).await;
                }
            });
        }

        let mut conns = Vec::new();
        loop {
            if self.config.auto_start && conns.len() >= self.config.min_players {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => {
                    spinner.finish_and_clear();
                    bail!("cancelled while waiting for players");
                }
                accepted = self.listener.accept() => {
                    let (stream, addr) = accepted.context("accepting peer")?;
                    if conns.len() >= self.config.max_players {
                        warn!("Lobby full, turning away {}", addr);
                        continue;
                    }
                    info!("Peer joined from {}", addr);
                    conns.push(stream);
                    spinner.set_message(format!(
                        "{}/{} players connected (enter starts the match)",
                        conns.len(),
                        self.config.max_players
                    ));
                }
                _ = start_rx.recv(), if !self.config.auto_start => {
                    if conns.len() >= self.config.min_players {
                        break;
                    }
                    info!(
                        "Need at least {} players, have {}",
                        self.config.min_players,
                        conns.len()
                    );
                }
            }
        }
        spinner.finish_and_clear();
        Ok(conns)
    }
}

/// One task per connection: pull direction requests off the socket and
/// drop them into the shared slot. A dead slot never comes back, not even
/// if the peer keeps sending.
fn spawn_reader(
    id: usize,
    mut reader: tokio::net::tcp::OwnedReadHalf,
    dirs: Arc<Mutex<Vec<DirSlot>>>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                value = wire::read_int(&mut reader) => {
                    match value {
                        Ok(v) => {
                            let mut slots = dirs.lock();
                            if slots[id].is_dead() {
                                continue;
                            }
                            match DirSlot::decode(v) {
                                Some(DirSlot::Moving(dir)) => slots[id] = DirSlot::Moving(dir),
                                // peers don't get to declare themselves dead
                                _ => debug!("Ignoring bad direction {} from peer {}", v, id),
                            }
                        }
                        Err(e) => {
                            debug!("Peer {} read ended: {}", id, e);
                            dirs.lock()[id] = DirSlot::Dead;
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = HostConfig::default();
        assert!(config.min_players >= 2);
        assert!(config.max_players <= START_SLOTS);
        assert!(config.timestep > PING);
    }
}
