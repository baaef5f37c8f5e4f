use crate::demo::{run_demo, run_history_export, DemoArgs, HistoryExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use room_audit::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Room Inspection Tracker",
    about = "Track meeting-room equipment reviews across office locations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with a room's review history from the command line
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Run an end-to-end CLI demo over an in-memory dataset
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// Export a room's review history from a stored dataset
    Export(HistoryExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured room data file
    #[arg(long)]
    pub(crate) data_path: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::History {
            command: HistoryCommand::Export(args),
        } => run_history_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
