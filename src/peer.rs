// Peer loop: the host's direction vector is ground truth, the local board
// is just a replay of it. A stalled host stalls every peer; that is the
// point of lock-step.

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::RngCore;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::arena::{Arena, SnakeKind};
use crate::console::{AnsiConsole, Console, draw_arena};
use crate::host::PING;
use crate::input::{InputQueue, MAX_INPUT_STACK, is_quit_key, p1_key_to_dir, resolve_direction};
use crate::network::{DirSlot, wire};
use crate::simulation::{engine, items};
use crate::snake::Snake;

#[derive(Debug, Clone)]
pub struct PeerConfig {
    pub addr: String,
    pub timestep: Duration,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:7777".to_string(),
            timestep: Duration::from_millis(150),
        }
    }
}

/// Replays one authoritative direction vector onto the local board, in
/// slot order, skipping dead slots. Unknown values mean the stream is
/// desynchronized and there is no recovering from that.
pub fn apply_vector(
    arena: &mut Arena,
    snakes: &mut [Snake],
    vector: &[i32],
    rng: &mut dyn RngCore,
    console: &mut dyn Console,
) -> Result<()> {
    for (i, &v) in vector.iter().enumerate() {
        match DirSlot::decode(v) {
            Some(DirSlot::Moving(dir)) => {
                engine::advance(arena, &mut snakes[i], dir, rng, console);
            }
            Some(DirSlot::Dead) => {}
            None => bail!("bad direction {v} in host vector"),
        }
    }
    Ok(())
}

fn is_connection_end(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::UnexpectedEof)
}

/// Connects, handshakes and plays until the match ends or the player
/// quits. The caller owns terminal raw mode.
pub async fn run(config: PeerConfig, cancel: CancellationToken) -> Result<()> {
    let stream = TcpStream::connect(&config.addr)
        .await
        .with_context(|| format!("connecting to {}", config.addr))?;
    let (mut reader, mut writer) = stream.into_split();

    let hello = wire::Hello::read(&mut reader).await?;
    info!(
        "Joined as peer {} of {}, board {}x{}",
        hello.peer_id, hello.peer_count, hello.width, hello.height
    );

    let mut arena = Arena::new(hello.width, hello.height);
    let count = hello.peer_count as usize;
    let my_id = hello.peer_id as usize;
    let mut snakes = Vec::with_capacity(count);
    for i in 0..count {
        // my snake renders as kind A, everyone else as B
        let kind = if i == my_id { SnakeKind::A } else { SnakeKind::B };
        snakes.push(Snake::at_slot(kind, i, &mut arena)?);
    }

    let mut console = AnsiConsole::new(hello.width, hello.height);
    draw_arena(&arena, &mut console);

    info!("Waiting for the host to start...");
    wire::read_go(&mut reader).await?;

    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let stdin_cancel = cancel.clone();
    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        loop {
            tokio::select! {
                byte = stdin.read_u8() => match byte {
                    Ok(b) => {
                        if key_tx.send(b).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                _ = stdin_cancel.cancelled() => break,
            }
        }
    });

    let mut queue = InputQueue::new(MAX_INPUT_STACK);
    let mut rng = StdRng::from_entropy();
    let mut last_tick = Instant::now();
    let target = config.timestep.saturating_sub(PING);

    loop {
        loop {
            let elapsed = last_tick.elapsed();
            if elapsed > target {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep((target - elapsed).mul_f32(0.9)) => {}
                _ = cancel.cancelled() => {}
            }
            if cancel.is_cancelled() {
                break;
            }
        }
        if cancel.is_cancelled() {
            info!("Quit");
            break;
        }
        last_tick = Instant::now();

        while let Ok(byte) = key_rx.try_recv() {
            if is_quit_key(byte) {
                cancel.cancel();
            }
            if let Some(dir) = p1_key_to_dir(byte) {
                queue.push(dir);
            }
        }
        if cancel.is_cancelled() {
            info!("Quit");
            break;
        }

        let want = resolve_direction(&mut queue, snakes[my_id].dir);
        wire::write_int(&mut writer, want.index()).await?;

        // lock-step: nothing happens until the host answers
        let vector = match wire::read_dir_vector(&mut reader, count).await {
            Ok(v) => v,
            Err(e) if is_connection_end(&e) => {
                info!("Host closed the match");
                break;
            }
            Err(e) => return Err(e),
        };
        apply_vector(&mut arena, &mut snakes, &vector, &mut rng, &mut console)?;

        match wire::read_item(&mut reader).await {
            Ok(Some((item, at))) => {
                debug!(?item, ?at, "item from host");
                items::place(&mut arena, item, at, &mut console);
            }
            Ok(None) => {}
            Err(e) if is_connection_end(&e) => {
                info!("Host closed the match");
                break;
            }
            Err(e) => return Err(e),
        }

        console.flush();
    }

    Ok(())
}
