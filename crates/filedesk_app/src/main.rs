mod cli;
mod platform;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = platform::run_app(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
