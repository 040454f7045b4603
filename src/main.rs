use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use dataset_splitter::cli::Cli;
use dataset_splitter::config::{FileSettings, SplitConfig};
use dataset_splitter::core::archive::{archive_path_for, create_tar_archive};
use dataset_splitter::logging::setup_logging;
use dataset_splitter::run;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.log_dir.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = FileSettings::load(cli.config.as_deref());
    let config = match cli.into_config(&settings) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate().and_then(|_| config.check_source()) {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    log_config(&config);

    let summary = match run(&config) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Dataset split failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Dataset split complete");
    summary.log();

    if let Some(path) = &config.summary_path {
        if let Err(e) = summary.write_json(path) {
            warn!("{}", e);
        }
    }

    if config.tar_output {
        let archive_path = archive_path_for(&config.dest_dir);
        if let Err(e) = create_tar_archive(&config.dest_dir, &archive_path) {
            warn!("Failed to create tar archive: {}", e);
        }
    }

    ExitCode::SUCCESS
}

fn log_config(config: &SplitConfig) {
    info!("Starting dataset split");
    info!("Source: {:?}", config.source_dir);
    info!("Destination: {:?}", config.dest_dir);
    info!("Training ratio: {:.2}%", config.training_ratio * 100.0);
    info!("Validation ratio: {:.2}%", config.validation_ratio() * 100.0);
    info!("Layout: {}", config.layout.as_str());
    if config.binary_mode {
        info!(
            "Binary mode, positive class: {}",
            config.positive_class().unwrap_or_default()
        );
    } else {
        info!("Minimum file count: {}", config.min_file_count);
    }
    info!("Tar output: {}", config.tar_output);
    info!(
        "Concurrency: {} classes, {} copy workers",
        config.max_concurrent_classes, config.max_copy_workers
    );
}
