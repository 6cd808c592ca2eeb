// CLI binary entry point for sonotag

mod cli;

use clap::Parser;
use std::process;

use cli::Config;

fn main() {
    let config = Config::parse();
    cli::init_logging(config.verbose);

    let result = cli::load_options(&config).and_then(|options| cli::run(&config, &options));
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
