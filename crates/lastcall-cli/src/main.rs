use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lastcall", version, about = "Lastcall CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Active task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Graveyard management and resurrection
    Grave {
        #[command(subcommand)]
        action: commands::grave::GraveAction,
    },
    /// Run one lifecycle tick
    Tick,
    /// Run the periodic tick driver in the foreground
    Watch {
        /// Seconds between ticks
        #[arg(long, default_value = "1")]
        interval_secs: u64,
    },
    /// Aggregate counters and success rate
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Grave { action } => commands::grave::run(action),
        Commands::Tick => commands::tick::run_once(),
        Commands::Watch { interval_secs } => commands::tick::run_watch(interval_secs),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
