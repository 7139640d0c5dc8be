mod platform;

use std::process::ExitCode;

use clap::Parser;
use surplus_logging::watch_error;

fn main() -> ExitCode {
    let cli = platform::Cli::parse();
    match platform::run_app(cli) {
        Ok(exit) => exit.code(),
        Err(err) => {
            watch_error!("Startup failed: {:#}", err);
            eprintln!("surplus_watch: {err:#}");
            ExitCode::from(1)
        }
    }
}
