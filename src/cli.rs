use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "twmomentum")]
#[command(about = "Taiwan stock momentum archive and chart API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Archive today's momentum signals and refresh ticker metadata
    Archive,
    /// Generate per-ticker price/indicator documents
    Generate,
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },
    /// Show archive and metadata status
    Status,
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Archive => {
            commands::archive::run();
        }
        Commands::Generate => {
            commands::generate::run();
        }
        Commands::Serve { port } => {
            commands::serve::run(port);
        }
        Commands::Status => {
            commands::status::run();
        }
    }
}
