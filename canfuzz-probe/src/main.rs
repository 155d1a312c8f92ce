// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use canfuzz::campaign::{Campaign, FloodConfig, Mode, SweepConfig};
use canfuzz::can::{CANSocket, SockAddrCAN};

mod config;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Canfuzz ECU fuzzing probe", long_about = None)]
struct Args {
    /// CAN network interface.
    #[arg(short, long, default_value = "vcan0")]
    interface: String,
    /// Seed for the frame generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Commands.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Sweep stability levels, biasing traffic toward valid commands.
    Sweep {
        /// Stability increment between levels.
        #[arg(long, default_value_t = canfuzz::consts::DEFAULT_SWEEP_STEP)]
        step: f64,
        /// Frames per stability level.
        #[arg(long, default_value_t = canfuzz::consts::DEFAULT_FRAMES_PER_LEVEL)]
        count: usize,
        /// Inter-frame delay in milliseconds.
        #[arg(long, default_value_t = 200)]
        delay: u64,
    },
    /// Flood fully randomized frames until interrupted.
    Flood {
        /// Inter-frame delay in milliseconds.
        #[arg(long, default_value_t = 100)]
        delay: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let bin_name = env!("CARGO_BIN_NAME");

    let mut config = config::ProbeConfig {
        interface: args.interface,
        seed: args.seed,
        global: canfuzz::GlobalConfig::default(),
    };

    config.global.bin_name = bin_name.to_string();
    config.global.daemon = args.daemon;

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);
    log_config.add_filter_ignore_str("mio");

    let log_level = if args.daemon {
        log::LevelFilter::Info
    } else {
        match args.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    let mode = match args.command {
        Command::Sweep { step, count, delay } => Mode::SweepWithBias(SweepConfig {
            step,
            frames_per_level: count,
            delay: Duration::from_millis(delay),
        }),
        Command::Flood { delay } => Mode::ContinuousRandom(FloodConfig {
            delay: Duration::from_millis(delay),
        }),
    };

    run(&config, mode).await
}

async fn run(config: &config::ProbeConfig, mode: Mode) -> anyhow::Result<()> {
    use canfuzz::Configurable;

    log::info!("Starting {}", config.global().bin_name);
    log::debug!("Bind to interface {}", config.interface);

    let socket =
        CANSocket::bind(&SockAddrCAN::new(&config.interface)).map_err(canfuzz::Error::Connect)?;

    log::info!("CAN interface {} opened", config.interface);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut campaign = Campaign::new(socket, rng);

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();

        log::info!("Termination requested");

        shutdown_tx.send(()).ok();
    });

    log::info!("Starting fuzzing campaign");

    let attempts = campaign.run(&mode, shutdown_rx).await?;

    log::info!(
        "Campaign finished; {} frames attempted; {} sent; {} failed",
        attempts,
        campaign.transmitter().sent(),
        campaign.transmitter().failed()
    );

    campaign
        .transmitter()
        .transport()
        .shutdown(std::net::Shutdown::Both)
        .ok();

    Ok(())
}
