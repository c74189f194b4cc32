mod builder;
mod config;
mod data;

use std::process::ExitCode;

use config::Config;

fn main() -> ExitCode {
    env_logger::init();

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            log::error!("resolving working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    match Config::resolve(&root).and_then(|config| builder::run(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
