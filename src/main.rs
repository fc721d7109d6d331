//! Pizza kitchen simulation CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pizza_kitchen::scheduler::{Kitchen, RunReport, TokioClock, VirtualClock};
use pizza_kitchen::KitchenConfig;

#[derive(Parser)]
#[command(name = "pizza-kitchen")]
#[command(about = "Simulate a staged pizza kitchen with fixed worker pools", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the number of orders
    #[arg(long, global = true)]
    orders: Option<usize>,

    /// Override the exclusive upper bound for topping counts
    #[arg(long, global = true)]
    max_toppings: Option<u32>,

    /// Override the length of one time unit in milliseconds
    #[arg(long, global = true)]
    time_unit_ms: Option<u64>,

    /// Seed for topping counts
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation (default if no command specified)
    Run {
        /// Use the discrete-event clock and finish instantly
        #[arg(long = "virtual")]
        virtual_clock: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON
    GenerateConfig {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None => run_command(config, false, false)?,
        Some(Commands::Run {
            virtual_clock,
            json,
        }) => run_command(config, virtual_clock, json)?,
        Some(Commands::GenerateConfig { output }) => generate_config_command(&config, output)?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<KitchenConfig> {
    let mut config = match &cli.config {
        Some(path) => KitchenConfig::from_file(path)?,
        None => KitchenConfig::default(),
    };

    // Apply overrides
    if let Some(orders) = cli.orders {
        config.orders = orders;
    }
    if let Some(max_toppings) = cli.max_toppings {
        config.max_toppings = max_toppings;
    }
    if let Some(time_unit_ms) = cli.time_unit_ms {
        config.time_unit_ms = time_unit_ms;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

fn run_command(config: KitchenConfig, virtual_clock: bool, json: bool) -> Result<()> {
    let kitchen = Kitchen::from_config(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let report = runtime.block_on(async {
        if virtual_clock {
            kitchen.run(&mut VirtualClock::new()).await
        } else {
            kitchen
                .run(&mut TokioClock::from_millis(config.time_unit_ms))
                .await
        }
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("=== KITCHEN SUMMARY ===");
    println!("orders_done={}", report.orders_done);
    println!("makespan={}", report.makespan);
    println!("avg_flow_time={:.2}", report.avg_flow_time);
    println!("max_flow_time={}", report.max_flow_time);
    println!("pairings={}", report.pairing_count());
    for station in &report.stations {
        println!(
            "station={} workers={} pairings={} passed={} busy={} utilization={:.1}%",
            station.name,
            station.workers,
            station.pairings,
            station.passed,
            station.busy_time,
            station.utilization * 100.0
        );
    }
    if let Some(bottleneck) = report.bottleneck() {
        println!("bottleneck={}", bottleneck.name);
    }
}

fn generate_config_command(config: &KitchenConfig, output: Option<PathBuf>) -> Result<()> {
    let json = config.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            tracing::info!("Configuration written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
