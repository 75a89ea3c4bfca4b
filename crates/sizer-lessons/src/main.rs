#![forbid(unsafe_code)]

//! Sizer lessons binary entry point.

use std::time::Duration;

use sizer_core::logging::init_file_logging;
use sizer_lessons::app::AppModel;
use sizer_lessons::{cli, headless};
use sizer_runtime::{Program, ProgramConfig};

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = init_file_logging(path, None)
    {
        eprintln!("Failed to enable file logging at {}: {e}", path.display());
        std::process::exit(1);
    }

    if opts.headless {
        match headless::run(&opts) {
            Ok(frame) => println!("{frame}"),
            Err(e) => {
                eprintln!("Invalid --keys script: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let model = AppModel::new(opts.lesson)
        .with_interval(Duration::from_millis(opts.interval_ms))
        .with_exit_after(Some(Duration::from_millis(opts.exit_after_ms)));

    match Program::with_config(model, ProgramConfig::default()) {
        Ok(mut program) => {
            if let Err(e) = program.run() {
                eprintln!("Runtime error: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    }
}
