use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use lane_sim::simulation::{SimConfig, SimEvent, SimWorld, VehicleKind};

#[derive(Parser)]
#[command(name = "lane_sim")]
#[command(about = "Discrete-step multi-lane road simulation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Step vehicles and signals for a fixed number of steps
    Run(RunArgs),
    /// Check which crossings each tracked vehicle can legally use
    Crossings(CrossingArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Number of ordinary cars
    #[arg(long, default_value = "1")]
    cars: usize,

    /// Number of trucks
    #[arg(long, default_value = "0")]
    trucks: usize,

    /// Number of buses
    #[arg(long, default_value = "0")]
    buses: usize,

    /// Signal ids, comma separated
    #[arg(long, value_delimiter = ',', default_value = "A")]
    signals: Vec<String>,

    /// Red, yellow and green durations for every signal (e.g. 10,2,15)
    #[arg(long, value_parser = parse_timers, allow_hyphen_values = true)]
    timers: Option<[i64; 3]>,

    /// Number of steps to run
    #[arg(long, default_value_t = SimConfig::default().steps)]
    steps: u32,

    /// Steps per simulated minute
    #[arg(long, default_value_t = SimConfig::default().steps_per_minute)]
    steps_per_minute: u32,
}

impl Default for RunArgs {
    fn default() -> Self {
        let config = SimConfig::default();
        Self {
            cars: 1,
            trucks: 0,
            buses: 0,
            signals: vec!["A".to_string()],
            timers: None,
            steps: config.steps,
            steps_per_minute: config.steps_per_minute,
        }
    }
}

#[derive(clap::Args)]
struct CrossingArgs {
    /// 0-based lane of each tracked vehicle, comma separated
    #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
    lanes: Vec<usize>,
}

/// Accepts "R,Y,G" or "R Y G"
fn parse_timers(s: &str) -> Result<[i64; 3], String> {
    let parts: Vec<&str> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    let [red, yellow, green] = parts.as_slice() else {
        return Err("expected exactly three numbers".to_string());
    };
    let parse = |part: &str| {
        part.parse::<i64>()
            .map_err(|e| format!("invalid number '{}': {}", part, e))
    };
    Ok([parse(*red)?, parse(*yellow)?, parse(*green)?])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,lane_sim=info"),
    )
    .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => run_headless(args),
        Command::Crossings(args) => run_crossings(args),
    }
}

/// Run the simulation in headless mode
fn run_headless(args: RunArgs) -> Result<()> {
    let config = SimConfig {
        steps: args.steps,
        steps_per_minute: args.steps_per_minute,
    };
    config.validate()?;

    println!("Running lane simulation in headless mode...");
    println!("Steps: {}, Steps per minute: {}", config.steps, config.steps_per_minute);
    println!();

    let mut world = SimWorld::with_config(config);

    for (kind, count) in [
        (VehicleKind::Car, args.cars),
        (VehicleKind::Truck, args.trucks),
        (VehicleKind::Bus, args.buses),
    ] {
        for n in 1..=count {
            world.add_vehicle(format!("{}-{}", kind.id_prefix(), n), kind);
        }
    }

    for id in &args.signals {
        match world.add_signal(id.trim()) {
            Ok(_) => println!("Traffic signal \"{}\" added.", id.trim()),
            Err(e) => println!("{}", e),
        }
    }

    if let Some([red, yellow, green]) = args.timers {
        for index in 0..world.signals.len() {
            match world.set_signal_durations(index, red, yellow, green) {
                Ok(()) => info!("Signal #{} timers set to {}/{}/{}", index, red, yellow, green),
                Err(e) => println!("{}", e),
            }
        }
    }
    println!();

    let events = world.run().context("Simulation run failed")?;
    for event in events {
        match event {
            SimEvent::Snapshot(snapshot) => println!("{}", snapshot),
            SimEvent::MinuteCompleted(_) => println!("---- One Minute Completed! ----"),
        }
    }

    println!();
    world.print_summary();
    Ok(())
}

/// Run the crossing survey for one tracked vehicle per lane argument
fn run_crossings(args: CrossingArgs) -> Result<()> {
    let mut world = SimWorld::new();

    for (n, lane) in args.lanes.iter().enumerate() {
        if let Err(e) = world.track_vehicle(format!("V{}", n + 1), *lane) {
            println!("{}", e);
        }
    }

    println!(
        "Simulating passage through {} crossings for {} vehicles...",
        world.layout.crossing_count(),
        world.checkers.len()
    );
    println!();

    let failures = world.check_crossings();
    for failure in &failures {
        println!("CAUGHT: {}", failure);
    }
    if !failures.is_empty() {
        warn!("{} crossing attempts failed", failures.len());
    }

    println!();
    println!("------ Final Crossing Statuses ------");
    for status in world.checker_statuses() {
        println!("{}", status);
    }
    Ok(())
}
