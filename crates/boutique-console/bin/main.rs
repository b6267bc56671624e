use clap::{Parser, Subcommand};
use eyre::Result;

mod cmd;

use cmd::console::ConsoleArgs;
use cmd::summary::SummaryArgs;

#[derive(Debug, Parser)]
#[command(name = "boutique-console", version, about = "Admin console for the boutique management backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive terminal console
    Console(ConsoleArgs),
    /// One-shot table summary of franchises and orders
    Summary(SummaryArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Console(args) => args.run(),
        Commands::Summary(args) => args.run(),
    }
}
