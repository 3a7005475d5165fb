/* 3rd party libraries */
use clap::Parser;
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::Builder;

/* Custom libraries */
use elevator_dispatch::console::run_console;
use elevator_dispatch::network::ElevatorUpdate;
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::{
    CallIntake, ChannelNotifier, Config, InMemoryRepository, SystemClock, TickScheduler,
};

#[derive(Parser)]
#[clap(name = "elevator-dispatch")]
#[clap(about = "Dispatches floor calls to elevators and steps them once per tick")]
struct Cli {
    /// Path to the TOML configuration file
    #[clap(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the tick period in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // Load the configuration
    let mut config = unwrap_or_exit!(Config::load(&cli.config));
    if let Some(tick_ms) = cli.tick_ms {
        config.scheduler.tick_interval_ms = tick_ms;
        unwrap_or_exit!(config.validate());
    }

    // Initialize shared state and channels
    let repository = Arc::new(InMemoryRepository::from_config(&config));
    let (notifier, update_rx) = ChannelNotifier::new();
    let (stop_tx, stop_rx) = cbc::unbounded::<()>();

    // Start the tick scheduler
    let scheduler_repository = repository.clone();
    let scheduler_config = config.scheduler.clone();
    let scheduler_thread = unwrap_or_exit!(Builder::new()
        .name("tick_scheduler".into())
        .spawn(move || {
            let clock = SystemClock::new(scheduler_config.tick_interval());
            let mut scheduler =
                TickScheduler::new(scheduler_repository, notifier, &scheduler_config);
            scheduler.run(&clock, &stop_rx);
        }));

    // Print every elevator update as a JSON line
    let printer_thread = unwrap_or_exit!(Builder::new()
        .name("update_printer".into())
        .spawn(move || print_updates(update_rx)));

    info!(
        "Serving {} buildings; commands: call <building> <floor>, dest <building> <pickup> <destination>, quit",
        config.buildings.len()
    );
    run_console(&CallIntake::new(repository), io::stdin().lock());

    // Shut down
    if stop_tx.send(()).is_err() {
        warn!("Tick scheduler already stopped");
    }
    if scheduler_thread.join().is_err() {
        error!("Tick scheduler thread panicked");
    }
    if printer_thread.join().is_err() {
        error!("Update printer thread panicked");
    }
}

fn print_updates(update_rx: cbc::Receiver<ElevatorUpdate>) {
    for update in update_rx.iter() {
        match serde_json::to_string(&update) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to serialize update: {}", e),
        }
    }
}
