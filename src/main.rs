use std::{process::ExitCode, sync::Arc};

use busnet::{
    services::{
        build::build_network,
        persistence::{load_network, save_network},
    },
    structures::Config,
    web::app::server,
};
use tracing::{error, info};

fn usage() -> ExitCode {
    eprintln!("Usage: busnet [build|serve] <config.yml>");
    ExitCode::FAILURE
}

fn build(config: &Config) -> Result<(), String> {
    let network = build_network(&config.build).map_err(|e| e.to_string())?;
    save_network(&network, &config.build.output).map_err(|e| e.to_string())
}

fn serve(config: &Config) -> Result<(), String> {
    let network = Arc::new(load_network(&config.serve.snapshot).map_err(|e| e.to_string())?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;
    runtime
        .block_on(server(network, &config.serve.bind))
        .map_err(|e| format!("Server stopped: {e}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        return usage();
    }

    let config = match Config::load(&args[2]) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match args[1].as_str() {
        "build" => build(&config),
        "serve" => serve(&config),
        _ => return usage(),
    };

    match result {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
