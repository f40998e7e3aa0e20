//! stresswatch
//!
//! Command-line interface for the stress-assessment service: run the
//! ingestion server, make one-shot inferences, or feed a running server
//! with simulated room readings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stresswatch::config::StresswatchConfig;
use stresswatch::http_client::post_json;
use stresswatch::sensor::sim::RoomSimulator;
use stresswatch::server::run_server;

#[derive(Parser)]
#[command(name = "stresswatch")]
#[command(version)]
#[command(about = "Screen-time and room-environment stress assessment", long_about = None)]
struct Cli {
    /// Configuration file (skips the default search path)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (debug-level logging)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP ingestion server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single inference and print the assessment as JSON
    Infer {
        /// Screen time in hours
        #[arg(long)]
        screen: f64,
        /// Room temperature in degrees Celsius
        #[arg(long)]
        temperature: f64,
        /// Relative humidity in percent
        #[arg(long)]
        humidity: f64,
        /// Air quality in ppm (lower is better)
        #[arg(long)]
        air_quality: f64,
    },

    /// Post simulated room readings to a running server
    Simulate {
        /// Sensor endpoint to post to
        #[arg(long, default_value = "http://127.0.0.1:5000/sensor")]
        url: String,
        /// Seconds between readings
        #[arg(long, default_value = "900")]
        interval: u64,
        /// Number of readings to send (0 = run until interrupted)
        #[arg(long, default_value = "0")]
        count: u64,
        /// Seed for reproducible readings
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default stresswatch.toml in the current directory
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = StresswatchConfig::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            config.apply_env_overrides();
            config
        }
        None => StresswatchConfig::load()?,
    };

    // --verbose wins over the configured level; RUST_LOG wins over both.
    let default_level = if cli.verbose {
        "debug"
    } else {
        config.general.log_level.as_filter()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Serve { port } => run_serve(config, port),
        Commands::Infer {
            screen,
            temperature,
            humidity,
            air_quality,
        } => run_infer(&config, screen, temperature, humidity, air_quality),
        Commands::Simulate {
            url,
            interval,
            count,
            seed,
        } => run_simulate(&url, interval, count, seed),
        Commands::Config { action } => run_config(&config, action),
    }
}

fn run_serve(mut config: StresswatchConfig, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(run_server(config))?;
    Ok(())
}

fn run_infer(
    config: &StresswatchConfig,
    screen: f64,
    temperature: f64,
    humidity: f64,
    air_quality: f64,
) -> Result<()> {
    let engine = config.engine.build();
    let assessment = engine.infer(screen, temperature, humidity, air_quality);
    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

fn run_simulate(url: &str, interval: u64, count: u64, seed: Option<u64>) -> Result<()> {
    let mut simulator = match seed {
        Some(seed) => RoomSimulator::with_seed(seed),
        None => RoomSimulator::new(),
    };

    info!(url, interval, "mock room sensor started");
    let mut sent: u64 = 0;
    loop {
        let reading = simulator.generate();
        let payload = serde_json::to_value(reading)?;
        match post_json(url, &payload) {
            Ok(response) => info!(
                temperature = reading.temperature,
                humidity = reading.humidity,
                air_quality = reading.air_quality,
                response = %response,
                "reading sent"
            ),
            Err(e) => warn!(error = %e, "failed to reach the server"),
        }

        sent += 1;
        if count > 0 && sent >= count {
            break;
        }
        std::thread::sleep(Duration::from_secs(interval));
    }
    info!(sent, "mock room sensor finished");
    Ok(())
}

fn run_config(config: &StresswatchConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Path::new("stresswatch.toml");
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            std::fs::write(path, StresswatchConfig::default_config_content())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Show => {
            println!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
