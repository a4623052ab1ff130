//! Flowsmith CLI - Compile workflow state diagrams into FSM documents

mod cli;
mod colorizer;

use clap::Parser;

fn main() {
    // Logging is initialized inside run() once the flags are known
    let cli_args = cli::Cli::parse();

    let mut app = cli::FlowsmithApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
