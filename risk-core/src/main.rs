//! Training entry point: `fire-train [path/to/train.toml]`.

use std::path::PathBuf;
use std::process::ExitCode;

use firerisk_core::{train, TrainingConfig};

const DEFAULT_CONFIG_PATH: &str = "train.toml";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = if config_path.is_file() {
        match TrainingConfig::from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("failed to load {}: {err}", config_path.display());
                return ExitCode::FAILURE;
            }
        }
    } else {
        log::info!(
            "config {} not found, using built-in defaults",
            config_path.display()
        );
        TrainingConfig::default()
    };

    match train::run(&config) {
        Ok(report) => {
            log::info!(
                "training complete: run {} selected {:?} (cv score {:.4}), model at {}",
                report.run_id,
                report.best_params,
                report.cv_score,
                report.model_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("training failed: {err}");
            ExitCode::FAILURE
        }
    }
}
