//! CLI entry point: load a job description, run `sqlldr`, report the result.

use clap::Parser;
use log::{error, info};
use sqlloader::application::LoadJob;
use sqlloader::config::{AppConfig, CliArgs};
use sqlloader::SqlLoader;
use std::process;
use std::time::Duration;

fn main() {
    env_logger::init();

    let args = CliArgs::parse();

    let mut config = if let Some(config_path) = &args.config {
        match AppConfig::from_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load config: {}", e);
                process::exit(1);
            }
        }
    } else {
        AppConfig::default()
    };
    config.apply_env();
    config.merge_cli(&args);

    let job = match LoadJob::from_file(&args.job) {
        Ok(j) => j,
        Err(e) => {
            error!("Failed to load job file: {}", e);
            process::exit(1);
        }
    };

    let mut loader = SqlLoader::from_config(config).delete_files_after_run(args.delete_files);
    if let Some(secs) = args.timeout {
        loader = loader.timeout(Duration::from_secs(secs));
    }

    let mut loader = match job.apply(loader) {
        Ok(l) => l,
        Err(e) => {
            error!("Invalid load job: {}", e);
            process::exit(1);
        }
    };

    if args.dry_run {
        match loader.debug_dump() {
            Ok(dump) => println!("{dump}"),
            Err(e) => {
                error!("Failed to render control file: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    info!("Starting load...");
    match loader.execute() {
        Ok(output) => {
            println!("{}", output.stdout);
            if output.successful() {
                info!("Load finished successfully.");
            } else {
                error!("Load failed (exit code {:?}).", output.exit_code);
                eprintln!("{}", output.stderr);
                eprintln!("{}", loader.logs());
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Loader failed: {:?}", e);
            process::exit(1);
        }
    }
}
