use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use yolocls::{resize_folder, ResizeArgs};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ResizeArgs::parse();

    info!(
        "Resizing images from {} into {} (max side {})",
        args.src.display(),
        args.dst.display(),
        args.max_side
    );

    match resize_folder(&args.src, &args.dst, &args.resize_options()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to resize {}: {}", args.src.display(), e);
            ExitCode::FAILURE
        }
    }
}
