// ,--.   ,--.,---. ,--.--.,--,--,--.,--,--,  ,---. ,-----.
// |  |.'.|  | .-. ||  .--'|        ||      \| .-. :'-----'
// |   .'.   ' '-' '|  |   |  |  |  ||  ||  |\   --.
// '--'   '--'`---' `--'   `--'`--'`--'`--''--' `----'
//
// Terminal snake with networked lock-step multiplayer. The host owns the
// board; everybody else just replays its broadcasts. Raw terminal mode is
// up to the launcher (stty raw -echo works fine).

use wormnet::prelude::*;
use wormnet::peer;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play locally against an AI, or another human with --pvp.
    Play {
        #[arg(short, long, default_value = "heat-map")]
        strategy: String,
        /// Two players on one keyboard: wasd vs ikjl.
        #[arg(long)]
        pvp: bool,
        #[arg(short, long, default_value_t = 150)]
        timestep: u64,
        #[arg(long, default_value_t = 60)]
        width: i32,
        #[arg(long, default_value_t = 25)]
        height: i32,
    },

    /// Let two strategies fight it out on screen.
    Watch {
        #[arg(short, long, default_value = "aggro")]
        left: String,
        #[arg(short, long, default_value = "defensive")]
        right: String,
        #[arg(short, long, default_value_t = 150)]
        timestep: u64,
        #[arg(long, default_value_t = 60)]
        width: i32,
        #[arg(long, default_value_t = 25)]
        height: i32,
        #[arg(long)]
        max_ticks: Option<u64>,
    },

    /// Host a networked match.
    Host {
        #[arg(short, long, default_value = "0.0.0.0:7777")]
        addr: String,
        #[arg(long, default_value_t = 60)]
        width: i32,
        #[arg(long, default_value_t = 25)]
        height: i32,
        #[arg(short, long, default_value_t = 150)]
        timestep: u64,
        #[arg(short, long, default_value_t = 2)]
        min_players: usize,
    },

    /// Join a hosted match.
    Join {
        #[arg(default_value = "127.0.0.1:7777")]
        addr: String,
        /// Must match the host's timestep.
        #[arg(short, long, default_value_t = 150)]
        timestep: u64,
    },

    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C, shutting down");
            ctrl_c_cancel.cancel();
        }
    });

    match cli.command {
        Commands::Play {
            strategy,
            pvp,
            timestep,
            width,
            height,
        } => {
            let mode = if pvp {
                GameMode::HumanVsHuman
            } else {
                GameMode::HumanVsAi { strategy }
            };
            let config = GameConfig::default()
                .with_mode(mode)
                .with_board(width, height)
                .with_timestep(Duration::from_millis(timestep));
            Game::new(config).run(cancel).await?;
        }

        Commands::Watch {
            left,
            right,
            timestep,
            width,
            height,
            max_ticks,
        } => {
            let mut config = GameConfig::default()
                .with_mode(GameMode::AiVsAi { left, right })
                .with_board(width, height)
                .with_timestep(Duration::from_millis(timestep));
            config.name = "watch_match".to_string();
            config.max_ticks = max_ticks;
            Game::new(config).run(cancel).await?;
        }

        Commands::Host {
            addr,
            width,
            height,
            timestep,
            min_players,
        } => {
            let config = HostConfig {
                addr,
                width,
                height,
                timestep: Duration::from_millis(timestep),
                min_players,
                ..HostConfig::default()
            };
            let host = Host::bind(config).await?;
            host.run(cancel).await?;
        }

        Commands::Join { addr, timestep } => {
            let config = PeerConfig {
                addr,
                timestep: Duration::from_millis(timestep),
            };
            peer::run(config, cancel).await?;
        }

        Commands::List => {
            println!("\nAvailable strategies");
            for strategy in StrategyRegistry::global().list() {
                println!("  - {}", strategy);
            }
            println!("\nUsage: cargo run -- play --strategy <name>");
            println!("Example: cargo run -- watch --left aggro --right heat-map\n");
        }
    }

    Ok(())
}
