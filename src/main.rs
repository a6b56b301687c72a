//! animscan CLI entry point.

use animscan::cli::{self, Cli, Commands, EXIT_ERROR};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.global.verbose);

    let result = match &cli.command {
        Commands::Extract(args) => cli::run_extract(&cli.global, args),
        Commands::Stats => cli::run_stats(&cli.global),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
