use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use yolocls::{prepare_dataset, write_report, Args, ImageFolderSource, LogObserver};

fn run(args: &Args) -> yolocls::Result<()> {
    let selection = args.class_selection()?;
    let source = ImageFolderSource::open(&args.source_dir)?;
    let splits = args.split_spec();

    let mut observer = LogObserver::default();
    let report = prepare_dataset(
        &source,
        &selection,
        &splits,
        &args.output_dir,
        &args.build_options(),
        &mut observer,
    )?;

    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }

    let incomplete = report.splits.iter().filter(|split| !split.is_complete()).count();
    if incomplete > 0 {
        info!(
            "{} split(s) ran out of source samples before reaching quota",
            incomplete
        );
    }
    info!("Dataset ready: {}", report.dataset_yaml.display());
    Ok(())
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting dataset build from {}", args.source_dir.display());
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to build dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
